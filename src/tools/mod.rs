pub mod system;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use system::SystemTools;

/// Exit disposition and captured diagnostics of one external-tool call.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub stderr: String,
}

/// Seam over the external command-line collaborators. The pipeline only
/// talks to tools through this trait so tests can substitute a mock.
pub trait ToolRunner {
    /// Names from `tools` that cannot be resolved to an executable.
    fn missing_tools(&self, tools: &[String]) -> Vec<String>;

    /// First line of the tool's version banner.
    fn version(&self, exe: &str, flag: &str) -> Result<String>;

    /// Runs the frame extractor over `video` with the given video filter,
    /// writing images matching `out_pattern` (zero-padded index pattern).
    fn extract_frames(
        &self,
        video: &Path,
        video_filter: &str,
        variable_rate: bool,
        out_pattern: &Path,
    ) -> Result<ToolOutput>;

    /// Compiles the ordered frame list into one multi-page PDF.
    fn compile_pdf(&self, frames: &[PathBuf], density: u32, out_pdf: &Path) -> Result<ToolOutput>;

    /// Recognizes text in a single (grayscale) image.
    fn recognize(&self, image: &Path) -> Result<String>;
}
