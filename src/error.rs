use crate::pipeline::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline errors. Each kind maps onto the stage it arises in; none
/// of them are retried. Per-frame OCR failures are recovered locally inside
/// the text stage and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required tools: {}", .tools.join(", "))]
    MissingTool { tools: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("frame extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("PDF compile failed: {diagnostic}")]
    CompileFailure { diagnostic: String },

    #[error("another run is already active in {}", .path.display())]
    WorkspaceBusy { path: PathBuf },

    #[error("{context}: {source}")]
    Io {
        stage: Stage,
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn io(stage: Stage, context: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let context = context.into();
        move |source| Self::Io {
            stage,
            context,
            source,
        }
    }

    /// The stage this error terminates the run in.
    pub fn stage(&self) -> Stage {
        match self {
            Self::MissingTool { .. } => Stage::Probing,
            Self::InvalidInput(_) | Self::WorkspaceBusy { .. } => Stage::Validating,
            Self::ExtractionFailure(_) => Stage::Extracting,
            Self::CompileFailure { .. } => Stage::Compiling,
            Self::Io { stage, .. } => *stage,
        }
    }

    /// Operator-facing hint printed alongside the error, where one exists.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::MissingTool { .. } => Some(
                "install the missing tools and make sure they are on PATH \
                 (e.g. `brew install ffmpeg imagemagick tesseract`)",
            ),
            Self::ExtractionFailure(_) => {
                Some("try a smaller interval or a lower scene-change threshold")
            }
            Self::CompileFailure { .. } => Some(
                "check that ImageMagick is installed and that its security policy allows \
                 writing PDF output:\n  in policy.xml, change the PDF coder policy from \
                 rights=\"none\" to rights=\"read|write\"",
            ),
            Self::WorkspaceBusy { .. } => Some(
                "if no other run is actually active (e.g. a previous run crashed), remove \
                 the stale .vid2pdf.lock file from the working space and retry",
            ),
            _ => None,
        }
    }
}
