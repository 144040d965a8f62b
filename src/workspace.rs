use crate::{error::PipelineError, pipeline::Stage};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const FRAMES_DIR: &str = "frames";
pub const LOCK_FILE: &str = ".vid2pdf.lock";

/// The on-disk location one pipeline run owns exclusively: a frames
/// subdirectory plus the final artifacts. The root is created idempotently;
/// the frames directory is destroyed and recreated every run so no stale
/// frames leak into a new document. Artifacts persist until the caller
/// removes them.
#[derive(Debug, Clone)]
pub struct WorkingSpace {
    root: PathBuf,
}

impl WorkingSpace {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.root.join(FRAMES_DIR)
    }

    pub fn ensure_root(&self) -> Result<(), PipelineError> {
        std::fs::create_dir_all(&self.root).map_err(PipelineError::io(
            Stage::Validating,
            format!("creating working space {}", self.root.display()),
        ))
    }

    /// Serializes runs against this space. Concurrent runs would race on the
    /// shared frames directory and artifact filenames, so a second run is
    /// rejected while the lock file exists.
    pub fn lock(&self) -> Result<RunLock, PipelineError> {
        let path = self.root.join(LOCK_FILE);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(RunLock { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(PipelineError::WorkspaceBusy {
                path: self.root.clone(),
            }),
            Err(e) => Err(PipelineError::Io {
                stage: Stage::Validating,
                context: format!("creating lock {}", path.display()),
                source: e,
            }),
        }
    }

    pub fn remove_frames(&self) -> Result<(), PipelineError> {
        match std::fs::remove_dir_all(self.frames_dir()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::Io {
                stage: Stage::CleaningUp,
                context: format!("removing {}", self.frames_dir().display()),
                source: e,
            }),
        }
    }
}

/// Released on drop, including on failure paths.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
