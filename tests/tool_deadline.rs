#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;
use vid2pdf::{
    config::Config,
    tools::{SystemTools, ToolRunner},
};

fn fake_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

#[test]
fn hung_tool_is_cut_off_at_the_deadline() {
    let dir = tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.tools.ffmpeg = fake_tool(dir.path(), "slow-extractor", "#!/bin/sh\nexec sleep 30\n");
    cfg.limits.stage_timeout_seconds = 1;

    let tools = SystemTools::new(&cfg);
    let start = Instant::now();
    let err = tools
        .extract_frames(
            Path::new("in.mp4"),
            "fps=1/1",
            false,
            &dir.path().join("frame%04d.png"),
        )
        .unwrap_err();

    assert!(err.to_string().contains("deadline"));
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "run was not ended promptly"
    );
}

#[test]
fn hung_tool_with_a_subprocess_is_cut_off_at_the_deadline() {
    let dir = tempdir().unwrap();
    // The sleep is a child of the shell, so killing the tool itself leaves
    // a process that still holds the inherited stderr pipe.
    let mut cfg = Config::default();
    cfg.tools.ffmpeg = fake_tool(dir.path(), "slow-extractor", "#!/bin/sh\nsleep 30\n");
    cfg.limits.stage_timeout_seconds = 1;

    let tools = SystemTools::new(&cfg);
    let start = Instant::now();
    let err = tools
        .extract_frames(
            Path::new("in.mp4"),
            "fps=1/1",
            false,
            &dir.path().join("frame%04d.png"),
        )
        .unwrap_err();

    assert!(err.to_string().contains("deadline"));
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "run was not ended promptly"
    );
}
