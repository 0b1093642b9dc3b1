//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bulletin: radio bulletin post-processing",
    long_about = "Trims, normalises and transcodes downloaded bulletins with ffmpeg and publishes them atomically."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "BULLETIN_CONFIG",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Processes one downloaded bulletin into its published location
    Process(ProcessArgs),
    /// Processes several programmes in one run and prints a JSON report
    Batch(BatchArgs),
    /// Prints what ffprobe reports about a media file as JSON
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Downloaded source file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Destination file to publish
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        required_unless_present = "programme",
        conflicts_with = "programme"
    )]
    pub output: Option<PathBuf>,

    /// Configured programme whose destination and trims are used
    #[arg(short = 'p', long = "programme", value_name = "NAME")]
    pub programme: Option<String>,

    /// Seconds to cut from the start, overriding the configuration
    #[arg(long, value_name = "SECONDS")]
    pub trim_start: Option<f64>,

    /// Seconds to cut from the end, overriding the configuration
    #[arg(long, value_name = "SECONDS")]
    pub trim_end: Option<f64>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Programme and source file, as NAME=FILE (repeatable)
    #[arg(long = "item", value_name = "NAME=FILE", required = true, value_parser = parse_item)]
    pub items: Vec<(String, PathBuf)>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// File to inspect
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// Parses `NAME=FILE`; the name may not be empty.
fn parse_item(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, file)) if !name.trim().is_empty() && !file.is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(file)))
        }
        _ => Err(format!("expected NAME=FILE, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(
            parse_item("World Update=/downloads/world.m4a").unwrap(),
            ("World Update".to_string(), PathBuf::from("/downloads/world.m4a"))
        );
        assert!(parse_item("no-separator").is_err());
        assert!(parse_item("=/downloads/world.m4a").is_err());
        assert!(parse_item("World Update=").is_err());
    }

    #[test]
    fn test_process_requires_output_or_programme() {
        assert!(Cli::try_parse_from(["bulletin", "process", "-i", "in.m4a"]).is_err());
        assert!(Cli::try_parse_from([
            "bulletin", "process", "-i", "in.m4a", "-o", "out.mp3", "-p", "News"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "bulletin",
            "--log-format",
            "json",
            "process",
            "-i",
            "in.m4a",
            "-p",
            "News",
            "--trim-start",
            "4.5",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.programme.as_deref(), Some("News"));
                assert_eq!(args.trim_start, Some(4.5));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_batch_items() {
        let cli = Cli::try_parse_from([
            "bulletin",
            "batch",
            "--item",
            "Six=/in/six.m4a",
            "--item",
            "World=/in/world.m4a",
        ])
        .unwrap();
        match cli.command {
            Commands::Batch(args) => assert_eq!(args.items.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
