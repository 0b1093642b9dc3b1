//! Runs the `bulletin` binary against a stand-in ffmpeg.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_bulletin");

/// Answers `-version`, then writes a partial output and hangs.
fn hanging_ffmpeg(dir: &Path) -> PathBuf {
    let path = dir.join("ffmpeg.sh");
    let script = "#!/bin/sh\n\
        if [ \"$1\" = \"-version\" ]; then echo 'ffmpeg version fake'; exit 0; fi\n\
        for last; do :; done\n\
        printf 'ID3' > \"$last\"\n\
        exec sleep 30\n";
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, ffmpeg: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    let toml = format!(
        "[converter]\nffmpeg_path = \"{}\"\nffprobe_path = \"/nonexistent/ffprobe\"\n",
        ffmpeg.display()
    );
    std::fs::write(&path, toml).unwrap();
    path
}

fn spawn_process(config: &Path, input: &Path, output: &Path) -> Child {
    Command::new(BIN)
        .arg("--config")
        .arg(config)
        .args(["process", "-i"])
        .arg(input)
        .arg("-o")
        .arg(output)
        .env_remove("BULLETIN_CONFIG")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> ExitStatus {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if started.elapsed() > timeout {
            child.kill().unwrap();
            panic!("bulletin did not exit within {:?}", timeout);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn entries(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

// One test, so no other child is forked while the script is open for writing.
#[test]
fn test_sigterm_and_missing_ffmpeg() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("news.m4a");
    std::fs::write(&input, b"source").unwrap();
    let out_dir = temp.path().join("out");
    let destination = out_dir.join("news.mp3");

    // Unusable ffmpeg fails before anything is created
    let missing = write_config(temp.path(), Path::new("/nonexistent/ffmpeg"));
    let mut child = spawn_process(&missing, &input, &destination);
    let status = wait_with_timeout(&mut child, Duration::from_secs(10));
    assert!(!status.success());
    assert!(!out_dir.exists());

    // SIGTERM mid-transcode removes the lock marker and the staging file
    let scripts = TempDir::new().unwrap();
    let ffmpeg = hanging_ffmpeg(scripts.path());
    let config = write_config(temp.path(), &ffmpeg);
    let mut child = spawn_process(&config, &input, &destination);

    let started = Instant::now();
    while !entries(&out_dir).iter().any(|n| n.contains(".processing.")) {
        if started.elapsed() > Duration::from_secs(10) {
            child.kill().unwrap();
            panic!("no staging file appeared in {}", out_dir.display());
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(entries(&out_dir).contains(&"news.mp3.lock".to_string()));

    let killed = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let status = wait_with_timeout(&mut child, Duration::from_secs(10));
    assert!(!status.success());
    assert!(status.code().is_some(), "exited through its own handler");
    assert!(entries(&out_dir).is_empty(), "left {:?}", entries(&out_dir));
    assert!(!destination.exists());
}
