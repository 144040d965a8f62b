use crate::error::PipelineError;
use serde::Serialize;
use std::path::PathBuf;

/// Scene-change sensitivity used when the caller leaves the threshold blank.
pub const DEFAULT_SCENE_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    FixedInterval,
    SceneChange,
}

/// A validated description of one pipeline run. Construction goes through
/// [`ExtractionRequest::validate`]; an out-of-range parameter is rejected,
/// never clamped.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub video: PathBuf,
    pub method: Method,
    pub parameter: f64,
    pub extract_text: bool,
    pub keep_frames: bool,
}

impl ExtractionRequest {
    pub fn validate(
        video: impl Into<PathBuf>,
        method: Method,
        raw_parameter: &str,
        extract_text: bool,
        keep_frames: bool,
    ) -> Result<Self, PipelineError> {
        let parameter = parse_parameter(method, raw_parameter)?;
        Ok(Self {
            video: video.into(),
            method,
            parameter,
            extract_text,
            keep_frames,
        })
    }

    pub fn check_source(&self) -> Result<(), PipelineError> {
        if !self.video.is_file() {
            return Err(PipelineError::InvalidInput(format!(
                "video file does not exist: {}",
                self.video.display()
            )));
        }
        Ok(())
    }
}

/// Parses and range-checks the method-specific parameter.
///
/// FixedInterval takes seconds between samples and must be a finite positive
/// number. SceneChange takes a sensitivity in [0,1]; blank input falls back
/// to [`DEFAULT_SCENE_THRESHOLD`].
pub fn parse_parameter(method: Method, raw: &str) -> Result<f64, PipelineError> {
    let raw = raw.trim();
    match method {
        Method::FixedInterval => {
            let interval: f64 = raw
                .parse()
                .map_err(|_| PipelineError::InvalidInput("interval must be positive".into()))?;
            if !interval.is_finite() || interval <= 0.0 {
                return Err(PipelineError::InvalidInput(
                    "interval must be positive".into(),
                ));
            }
            Ok(interval)
        }
        Method::SceneChange => {
            if raw.is_empty() {
                return Ok(DEFAULT_SCENE_THRESHOLD);
            }
            let threshold: f64 = raw
                .parse()
                .map_err(|_| PipelineError::InvalidInput("threshold must be in [0,1]".into()))?;
            if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                return Err(PipelineError::InvalidInput(
                    "threshold must be in [0,1]".into(),
                ));
            }
            Ok(threshold)
        }
    }
}
