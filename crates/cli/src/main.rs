mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bulletin_core::{
    load_config, validate_config, AudioPipeline, Config, ConfigError, FfprobeInspector,
    ItemOverrides, MediaProbe, ProcessOutcome, ProcessingRequest,
};

use cli::{BatchArgs, Cli, Commands, LogFormat, ProbeArgs, ProcessArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so JSON reports on stdout stay parseable
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Process(args) => {
            let config = if args.programme.is_some() {
                load_required(&cli.config)?
            } else {
                load_or_default(&cli.config)?
            };
            process(&config, args).await
        }
        Commands::Batch(args) => {
            let config = load_required(&cli.config)?;
            batch(&config, args).await
        }
        Commands::Probe(args) => {
            let config = load_or_default(&cli.config)?;
            probe(&config, args).await
        }
    }
}

/// Loads and validates the configuration file, which must exist.
fn load_required(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    let config =
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?;
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Loads the configuration file, falling back to defaults when it is absent.
fn load_or_default(path: &Path) -> Result<Config> {
    match load_required(path) {
        Ok(config) => Ok(config),
        Err(e) if matches!(e.downcast_ref::<ConfigError>(), Some(ConfigError::FileNotFound(_))) => {
            warn!("No configuration at {:?}, using defaults", path);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

async fn process(config: &Config, args: ProcessArgs) -> Result<bool> {
    let request = match (&args.programme, &args.output) {
        (Some(name), _) => {
            let programme = config
                .programme(name)
                .ok_or_else(|| anyhow!("Programme '{}' is not configured", name))?;
            ProcessingRequest::for_programme(config, programme, &args.input)
        }
        (None, Some(output)) => ProcessingRequest::new(&args.input, output),
        (None, None) => return Err(anyhow!("Either --output or --programme is required")),
    };

    let request = if args.trim_start.is_some() || args.trim_end.is_some() {
        let base = request.overrides().copied().unwrap_or_default();
        request.with_overrides(ItemOverrides {
            trim_start_seconds: args.trim_start.or(base.trim_start_seconds),
            trim_end_seconds: args.trim_end.or(base.trim_end_seconds),
        })
    } else {
        request
    };

    let pipeline = AudioPipeline::from_config(config);
    pipeline.validate().await.context("ffmpeg is not usable")?;

    // Dropping the pipeline future releases the lock, removes the staging
    // file and kills ffmpeg.
    let result = tokio::select! {
        result = pipeline.run(&request) => result,
        _ = shutdown_signal() => {
            warn!("Interrupted, abandoning {}", request.destination_path().display());
            return Err(anyhow!("Interrupted by signal"));
        }
    };

    match result {
        Ok(outcome) => {
            info!("{}", outcome_message(&outcome, request.destination_path()));
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

fn outcome_message(outcome: &ProcessOutcome, destination: &Path) -> String {
    match outcome {
        ProcessOutcome::Published { size_bytes, .. } => {
            format!("Published {} ({} bytes)", destination.display(), size_bytes)
        }
        ProcessOutcome::AlreadyPresent => format!("{} already exists", destination.display()),
        ProcessOutcome::Deferred => format!(
            "{} is being processed by another owner, not published yet",
            destination.display()
        ),
    }
}

async fn batch(config: &Config, args: BatchArgs) -> Result<bool> {
    let mut requests = Vec::with_capacity(args.items.len());
    for (name, input) in &args.items {
        let programme = config
            .programme(name)
            .ok_or_else(|| anyhow!("Programme '{}' is not configured", name))?;
        requests.push(ProcessingRequest::for_programme(config, programme, input));
    }

    let pipeline = AudioPipeline::from_config(config);
    pipeline.validate().await.context("ffmpeg is not usable")?;

    let report = tokio::select! {
        report = pipeline.process_batch(&requests) => report,
        _ = shutdown_signal() => {
            warn!("Interrupted, abandoning the remaining batch items");
            return Err(anyhow!("Interrupted by signal"));
        }
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(report.is_success())
}

async fn probe(config: &Config, args: ProbeArgs) -> Result<bool> {
    let inspector = FfprobeInspector::new(config.converter.clone());
    match inspector.probe(&args.path).await {
        Some(info) => {
            let json =
                serde_json::to_string_pretty(&info).context("Failed to serialize media info")?;
            println!("{}", json);
            Ok(true)
        }
        None => {
            error!("Could not probe {}", args.path.display());
            Ok(false)
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletin_core::EndTrim;

    #[test]
    fn test_outcome_message() {
        let destination = Path::new("/srv/podcasts/news.mp3");

        let published = ProcessOutcome::Published {
            size_bytes: 2048,
            duration_ms: 40,
            end_trim: EndTrim::NotRequested,
        };
        assert_eq!(
            outcome_message(&published, destination),
            "Published /srv/podcasts/news.mp3 (2048 bytes)"
        );
        assert_eq!(
            outcome_message(&ProcessOutcome::AlreadyPresent, destination),
            "/srv/podcasts/news.mp3 already exists"
        );

        let deferred = outcome_message(&ProcessOutcome::Deferred, destination);
        assert!(deferred.contains("not published yet"));
        assert!(!deferred.contains("ready"));
    }
}
