use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub tools: Tools,
    #[serde(default)]
    pub extraction: Extraction,
    #[serde(default)]
    pub compile: Compile,
    #[serde(default)]
    pub ocr: Ocr,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub print_summary: bool,
    pub keep_frames: bool,
    pub write_report_json: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            print_summary: true,
            keep_frames: false,
            write_report_json: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Working space root. One pipeline run owns this directory exclusively
    /// while it holds the run lock.
    pub work_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            work_dir: "~/Documents/Video_to_PDF_output".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tools {
    pub ffmpeg: String,
    /// ImageMagick entry point; "convert" for v6, "magick" for v7.
    pub magick: String,
    pub tesseract: String,
}
impl Default for Tools {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".into(),
            magick: "convert".into(),
            tesseract: "tesseract".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Seconds between samples when `run` is given no --param for the
    /// fixed-interval method.
    pub default_interval: f64,
}
impl Default for Extraction {
    fn default() -> Self {
        Self {
            default_interval: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compile {
    /// Rendering density in DPI. 300 keeps recognizable text legible.
    pub density: u32,
    pub pdf_filename: String,
}
impl Default for Compile {
    fn default() -> Self {
        Self {
            density: 300,
            pdf_filename: "output.pdf".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ocr {
    pub language: String,
    pub text_filename: String,
}
impl Default for Ocr {
    fn default() -> Self {
        Self {
            language: "eng".into(),
            text_filename: "output.md".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Per-invocation deadline for external tools. 0 disables the deadline,
    /// which reproduces the hang-forever behavior of a stuck tool.
    pub stage_timeout_seconds: u64,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            stage_timeout_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            dump_effective_config: false,
        }
    }
}
