use super::{ToolOutput, ToolRunner};
use crate::{config::Config, probe};
use anyhow::{Context, Result, anyhow};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs the real ffmpeg / ImageMagick / tesseract binaries as child
/// processes, each under the configured stage deadline.
pub struct SystemTools {
    cfg: Config,
}

impl SystemTools {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }

    fn deadline(&self) -> Option<Duration> {
        let secs = self.cfg.limits.stage_timeout_seconds;
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    fn run(&self, mut cmd: Command, label: &str) -> Result<Output> {
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        debug!("spawning {label}: {cmd:?} deadline={:?}", self.deadline());

        let mut child = cmd.spawn().with_context(|| format!("spawning {label}"))?;
        match self.deadline() {
            Some(limit) => wait_with_timeout(&mut child, limit, label),
            None => child
                .wait_with_output()
                .with_context(|| format!("waiting for {label}")),
        }
    }
}

impl ToolRunner for SystemTools {
    fn missing_tools(&self, tools: &[String]) -> Vec<String> {
        tools
            .iter()
            .filter(|name| probe::resolve_on_path(name).is_none())
            .cloned()
            .collect()
    }

    fn version(&self, exe: &str, flag: &str) -> Result<String> {
        let mut cmd = Command::new(exe);
        cmd.arg(flag);
        let out = self.run(cmd, exe)?;
        if !out.status.success() {
            return Err(anyhow!(
                "{exe} {flag} failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ));
        }
        // Some tools print the banner on stderr.
        let banner = if out.stdout.is_empty() {
            out.stderr
        } else {
            out.stdout
        };
        let banner = String::from_utf8_lossy(&banner);
        Ok(banner.lines().next().unwrap_or_default().to_string())
    }

    fn extract_frames(
        &self,
        video: &Path,
        video_filter: &str,
        variable_rate: bool,
        out_pattern: &Path,
    ) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.cfg.tools.ffmpeg);
        cmd.arg("-i").arg(video);
        cmd.arg("-vf").arg(video_filter);
        if variable_rate {
            // Frame count should follow detected scene changes, not a cadence.
            cmd.arg("-vsync").arg("vfr");
        }
        cmd.arg(out_pattern);

        let out = self.run(cmd, "ffmpeg")?;
        Ok(ToolOutput {
            success: out.status.success(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn compile_pdf(&self, frames: &[PathBuf], density: u32, out_pdf: &Path) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.cfg.tools.magick);
        cmd.arg("-density").arg(density.to_string());
        cmd.args(frames);
        cmd.arg(out_pdf);

        let out = self.run(cmd, "imagemagick")?;
        Ok(ToolOutput {
            success: out.status.success(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn recognize(&self, image: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.cfg.tools.tesseract);
        cmd.arg(image);
        cmd.arg("stdout");
        cmd.arg("-l").arg(&self.cfg.ocr.language);

        let out = self.run(cmd, "tesseract")?;
        if !out.status.success() {
            return Err(anyhow!(
                "tesseract failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration, label: &str) -> Result<Output> {
    // Drain pipes while waiting so a chatty tool can't deadlock itself
    // on a full stdout/stderr buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("{label} timed out after {timeout:?}");
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            // The drain threads are deliberately not joined: a subprocess of
            // the tool can still hold the pipe write ends, and joining would
            // block until it exits, long past the deadline. The detached
            // threads finish on their own once the pipes close.
            return Err(anyhow!("{label} exceeded its deadline ({timeout:?})"));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
