use crate::{ocr::FrameOcr, request::Method};
use serde::Serialize;

/// Machine-readable summary of one successful run, optionally written as
/// `report.json` next to the artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: String,
    pub method: Method,
    pub parameter: f64,
    pub frame_count: u32,
    pub pdf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub ocr: Vec<FrameOcr>,
    pub kept_frames: bool,
    pub started: String,
    pub finished: String,
}
