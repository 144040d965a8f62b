use crate::{config::Config, error::PipelineError, tools::ToolRunner};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ToolReport {
    pub ok: bool,
    pub tools: Vec<ToolStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<String>,
    pub version: Option<String>,
}

/// The external tools a run needs. The OCR engine is only required when the
/// caller asked for the text stage.
pub fn required_tools(cfg: &Config, with_ocr: bool) -> Vec<String> {
    let mut tools = vec![cfg.tools.ffmpeg.clone(), cfg.tools.magick.clone()];
    if with_ocr {
        tools.push(cfg.tools.tesseract.clone());
    }
    tools
}

/// Verifies every required tool resolves before any filesystem mutation.
/// Reports all missing tools at once rather than the first.
pub fn probe_tools<T: ToolRunner>(
    cfg: &Config,
    tools: &T,
    with_ocr: bool,
) -> Result<(), PipelineError> {
    let missing = tools.missing_tools(&required_tools(cfg, with_ocr));
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingTool { tools: missing })
    }
}

/// Resolves an executable name the way the shell would. Names carrying a
/// path separator are checked directly; bare names are searched on PATH.
pub fn resolve_on_path(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let full = dir.join(name);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{name}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

/// Diagnostic report behind the `doctor` subcommand: resolution plus the
/// version banner of each tool.
pub fn doctor(cfg: &Config, tools: &dyn ToolRunner) -> ToolReport {
    let named = [
        (&cfg.tools.ffmpeg, "-version"),
        (&cfg.tools.magick, "-version"),
        (&cfg.tools.tesseract, "--version"),
    ];

    let mut statuses = Vec::new();
    for (name, flag) in named {
        let path = resolve_on_path(name);
        let version = path
            .as_ref()
            .and_then(|_| tools.version(name, flag).ok());
        statuses.push(ToolStatus {
            name: name.clone(),
            path: path.map(|p| p.display().to_string()),
            version,
        });
    }

    ToolReport {
        ok: statuses.iter().all(|t| t.path.is_some()),
        tools: statuses,
    }
}
