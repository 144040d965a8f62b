use crate::{error::PipelineError, extract::FrameSequence, tools::ToolRunner};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Pdf,
    Text,
}

/// A deterministically-named output file owned by the working space.
/// Re-running the pipeline overwrites it rather than accumulating copies.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Compiles the ordered frame sequence into one multi-page PDF at the
/// configured density. Compile failures carry the tool's diagnostic text
/// verbatim; this class of failure is operator-environment-dependent
/// (missing install, PDF coder blocked by security policy) and is never
/// retried here. A failed compile leaves no partial PDF behind.
pub fn compile<T: ToolRunner>(
    tools: &T,
    density: u32,
    frames: &FrameSequence,
    pdf_path: &Path,
) -> Result<Artifact, PipelineError> {
    info!(
        "compiling {} frames into {} at density {density}",
        frames.len(),
        pdf_path.display()
    );

    let out = tools
        .compile_pdf(frames.paths(), density, pdf_path)
        .map_err(|e| PipelineError::CompileFailure {
            diagnostic: format!("{e:#}"),
        })?;

    if !out.success {
        if pdf_path.exists() {
            let _ = std::fs::remove_file(pdf_path);
        }
        return Err(PipelineError::CompileFailure {
            diagnostic: out.stderr.trim().to_string(),
        });
    }

    if !pdf_path.is_file() {
        return Err(PipelineError::CompileFailure {
            diagnostic: "compiler exited cleanly but produced no PDF".into(),
        });
    }

    Ok(Artifact {
        kind: ArtifactKind::Pdf,
        path: pdf_path.to_path_buf(),
    })
}
