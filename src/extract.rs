use crate::{
    error::PipelineError,
    pipeline::Stage,
    request::{ExtractionRequest, Method},
    tools::ToolRunner,
};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};

/// Fixed zero-padded output pattern handed to the frame extractor. The
/// 4-digit index makes lexicographic filename order equal extraction order.
pub const FRAME_PATTERN: &str = "frame%04d.png";

static FRAME_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^frame\d{4}\.(png|jpg)$").expect("frame filename pattern"));

/// ffmpeg video-filter expression for the chosen method: fixed-interval
/// sampling at 1/t fps, or scene-change gating on the frame score.
pub fn filter_expr(method: Method, parameter: f64) -> String {
    match method {
        Method::FixedInterval => format!("fps=1/{parameter}"),
        Method::SceneChange => format!("select='gt(scene,{parameter})'"),
    }
}

/// Ordered, deduplicated view of the extracted frame images.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: Vec<PathBuf>,
}

impl FrameSequence {
    /// Enumerates `dir` for files matching the fixed frame naming scheme,
    /// sorted lexicographically so extraction order is preserved regardless
    /// of filesystem enumeration order.
    pub fn from_dir(dir: &Path) -> Result<Self, PipelineError> {
        let entries = std::fs::read_dir(dir)
            .map_err(PipelineError::io(Stage::Extracting, format!("listing {}", dir.display())))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(PipelineError::io(Stage::Extracting, format!("listing {}", dir.display())))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if FRAME_FILE.is_match(name) {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(Self {
            frames: names.into_iter().map(|n| dir.join(n)).collect(),
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Clears and recreates `frames_dir`, invokes the extractor, and collects
/// the resulting frame sequence. Zero frames is a terminal failure for the
/// run; the caller should retry with different parameters, we never do.
pub fn extract<T: ToolRunner>(
    tools: &T,
    req: &ExtractionRequest,
    frames_dir: &Path,
) -> Result<FrameSequence, PipelineError> {
    if frames_dir.exists() {
        std::fs::remove_dir_all(frames_dir).map_err(PipelineError::io(
            Stage::Extracting,
            format!("clearing {}", frames_dir.display()),
        ))?;
    }
    std::fs::create_dir_all(frames_dir).map_err(PipelineError::io(
        Stage::Extracting,
        format!("creating {}", frames_dir.display()),
    ))?;

    let video_filter = filter_expr(req.method, req.parameter);
    let variable_rate = matches!(req.method, Method::SceneChange);
    let out_pattern = frames_dir.join(FRAME_PATTERN);

    info!("extracting frames with filter {video_filter}");
    let out = tools
        .extract_frames(&req.video, &video_filter, variable_rate, &out_pattern)
        .map_err(|e| PipelineError::ExtractionFailure(format!("{e:#}")))?;

    if !out.success {
        warn!("frame extractor exited nonzero: {}", tail(&out.stderr, 3));
    }

    let frames = FrameSequence::from_dir(frames_dir)?;
    if frames.is_empty() {
        let mut msg = String::from("no frames were extracted; try adjusting the parameters");
        let diag = tail(&out.stderr, 3);
        if !out.success && !diag.is_empty() {
            msg.push_str(&format!(" (extractor said: {diag})"));
        }
        return Err(PipelineError::ExtractionFailure(msg));
    }

    info!("extracted {} frames", frames.len());
    Ok(frames)
}

fn tail(s: &str, lines: usize) -> String {
    let all: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join(" / ")
}
