use crate::{error::PipelineError, extract::FrameSequence, pipeline::Stage, tools::ToolRunner};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Explicit per-frame recognition status. A frame that recognized to empty
/// text is `ok` with `chars == 0`; a frame whose recognition failed carries
/// the error. The distinction only shows up here and in logs, never as a
/// run failure.
#[derive(Debug, Clone, Serialize)]
pub struct FrameOcr {
    pub page: u32,
    pub file: String,
    pub ok: bool,
    pub chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcrOutput {
    /// Per-frame text in page order, separated by exactly one blank line.
    /// Failed and empty frames contribute nothing.
    pub text: String,
    pub frames: Vec<FrameOcr>,
}

/// Runs the OCR engine over every frame in sequence order. Each frame is
/// converted to grayscale first; that is a required preprocessing step, it
/// measurably improves recognition accuracy. Per-frame failures are logged
/// and recorded, and the stage continues with the remaining frames.
pub fn extract_text<T: ToolRunner>(
    tools: &T,
    frames: &FrameSequence,
    scratch_dir: &Path,
) -> Result<OcrOutput, PipelineError> {
    std::fs::create_dir_all(scratch_dir).map_err(PipelineError::io(
        Stage::ExtractingText,
        format!("creating {}", scratch_dir.display()),
    ))?;

    let mut parts: Vec<String> = Vec::new();
    let mut statuses = Vec::with_capacity(frames.len());

    for (i, frame) in frames.paths().iter().enumerate() {
        let page = (i + 1) as u32;
        let file = frame
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match recognize_frame(tools, frame, scratch_dir, page) {
            Ok(text) => {
                let text = text.trim_end().to_string();
                debug!("page {page}: recognized {} chars", text.chars().count());
                statuses.push(FrameOcr {
                    page,
                    file,
                    ok: true,
                    chars: text.chars().count(),
                    error: None,
                });
                if !text.is_empty() {
                    parts.push(text);
                }
            }
            Err(err) => {
                warn!("ocr failed for {}: {err}", frame.display());
                statuses.push(FrameOcr {
                    page,
                    file,
                    ok: false,
                    chars: 0,
                    error: Some(err),
                });
            }
        }
    }

    let _ = std::fs::remove_dir_all(scratch_dir);

    Ok(OcrOutput {
        text: parts.join("\n\n"),
        frames: statuses,
    })
}

fn recognize_frame<T: ToolRunner>(
    tools: &T,
    frame: &Path,
    scratch_dir: &Path,
    page: u32,
) -> Result<String, String> {
    let img = image::open(frame).map_err(|e| format!("open image: {e}"))?;
    let gray = img.to_luma8();
    let gray_path = scratch_dir.join(format!("gray{page:04}.png"));
    gray.save(&gray_path)
        .map_err(|e| format!("write grayscale image: {e}"))?;

    let result = tools
        .recognize(&gray_path)
        .map_err(|e| format!("{e:#}"));
    let _ = std::fs::remove_file(&gray_path);
    result
}
