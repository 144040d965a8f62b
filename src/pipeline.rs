use crate::{
    compile::{self, Artifact, ArtifactKind},
    config::Config,
    error::PipelineError,
    extract, ocr, probe,
    report::RunReport,
    request::ExtractionRequest,
    tools::ToolRunner,
    util::now_rfc3339,
    workspace::WorkingSpace,
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

pub const REPORT_FILE: &str = "report.json";

/// Pipeline stages in execution order. A run moves through them strictly
/// sequentially; any failure terminates the run in the originating stage.
/// The text and cleanup stages are skipped, not failed, when not requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Probing,
    Validating,
    Extracting,
    Compiling,
    ExtractingText,
    CleaningUp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Probing => "probing",
            Stage::Validating => "validating",
            Stage::Extracting => "extracting",
            Stage::Compiling => "compiling",
            Stage::ExtractingText => "extracting_text",
            Stage::CleaningUp => "cleaning_up",
        };
        f.write_str(name)
    }
}

pub struct Pipeline<T: ToolRunner> {
    cfg: Config,
    tools: T,
}

#[derive(Debug)]
pub struct RunOutput {
    pub pdf: Artifact,
    pub text: Option<Artifact>,
    pub report: RunReport,
}

impl<T: ToolRunner> Pipeline<T> {
    pub fn new(cfg: &Config, tools: T) -> Self {
        Self {
            cfg: cfg.clone(),
            tools,
        }
    }

    /// Runs extract -> compile -> optional OCR -> optional cleanup against
    /// `space`. Data flows one-directional through the stage outputs; no
    /// stage mutates another's output after handoff.
    pub fn run(
        &self,
        req: &ExtractionRequest,
        space: &WorkingSpace,
    ) -> Result<RunOutput, PipelineError> {
        let started = now_rfc3339();

        // Probing: fail fast, before any filesystem mutation.
        probe::probe_tools(&self.cfg, &self.tools, req.extract_text)?;

        // Validating: the parameter was range-checked at construction;
        // the source path and the space itself are checked here.
        req.check_source()?;
        space.ensure_root()?;
        let _lock = space.lock()?;
        info!("working space: {}", space.root().display());

        // Extracting: the frames directory is reset inside.
        let frames = extract::extract(&self.tools, req, &space.frames_dir())?;

        // Compiling.
        let pdf_path = space.root().join(&self.cfg.compile.pdf_filename);
        let pdf = compile::compile(&self.tools, self.cfg.compile.density, &frames, &pdf_path)?;
        info!("wrote {}", pdf.path.display());

        // ExtractingText (optional).
        let mut text_artifact = None;
        let mut ocr_frames = Vec::new();
        if req.extract_text {
            let scratch = space.root().join(".ocr-scratch");
            let out = ocr::extract_text(&self.tools, &frames, &scratch)?;
            let text_path = space.root().join(&self.cfg.ocr.text_filename);
            std::fs::write(&text_path, &out.text).map_err(PipelineError::io(
                Stage::ExtractingText,
                format!("writing {}", text_path.display()),
            ))?;
            info!("wrote {}", text_path.display());
            ocr_frames = out.frames;
            text_artifact = Some(Artifact {
                kind: ArtifactKind::Text,
                path: text_path,
            });
        } else {
            debug!("text extraction not requested; skipping");
        }

        // CleaningUp (optional).
        if req.keep_frames {
            info!("frames kept in {}", space.frames_dir().display());
        } else {
            space.remove_frames()?;
            debug!("removed frames directory");
        }

        let report = RunReport {
            input: req.video.display().to_string(),
            method: req.method,
            parameter: req.parameter,
            frame_count: frames.len() as u32,
            pdf: pdf.path.display().to_string(),
            text: text_artifact
                .as_ref()
                .map(|a| a.path.display().to_string()),
            ocr: ocr_frames,
            kept_frames: req.keep_frames,
            started,
            finished: now_rfc3339(),
        };

        if self.cfg.global.write_report_json {
            let report_path = space.root().join(REPORT_FILE);
            let body = serde_json::to_string_pretty(&report).map_err(|e| PipelineError::Io {
                stage: Stage::CleaningUp,
                context: "serializing run report".into(),
                source: std::io::Error::other(e),
            })?;
            std::fs::write(&report_path, body).map_err(PipelineError::io(
                Stage::CleaningUp,
                format!("writing {}", report_path.display()),
            ))?;
        }

        Ok(RunOutput {
            pdf,
            text: text_artifact,
            report,
        })
    }
}
