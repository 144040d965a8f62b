use anyhow::Result;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use vid2pdf::{
    extract::FrameSequence,
    ocr,
    tools::{ToolOutput, ToolRunner},
};

/// Recognizer-only mock: records which files it was handed and replies with
/// canned text per page.
struct Recognizer {
    seen: RefCell<Vec<String>>,
    replies: Vec<&'static str>,
}

impl ToolRunner for Recognizer {
    fn missing_tools(&self, _tools: &[String]) -> Vec<String> {
        Vec::new()
    }

    fn version(&self, _exe: &str, _flag: &str) -> Result<String> {
        Ok("mock".into())
    }

    fn extract_frames(
        &self,
        _video: &Path,
        _video_filter: &str,
        _variable_rate: bool,
        _out_pattern: &Path,
    ) -> Result<ToolOutput> {
        unreachable!("not used by the OCR stage")
    }

    fn compile_pdf(&self, _frames: &[PathBuf], _density: u32, _out: &Path) -> Result<ToolOutput> {
        unreachable!("not used by the OCR stage")
    }

    fn recognize(&self, image_path: &Path) -> Result<String> {
        let name = image_path.file_name().unwrap().to_string_lossy().into_owned();
        self.seen.borrow_mut().push(name.clone());
        let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
        let page: usize = digits.parse()?;
        Ok(self.replies[page - 1].to_string())
    }
}

fn write_frames(dir: &Path, count: usize) {
    for i in 1..=count {
        let img = image::GrayImage::new(4, 4);
        img.save(dir.join(format!("frame{i:04}.png"))).unwrap();
    }
}

#[test]
fn recognizer_is_fed_grayscale_scratch_images_in_page_order() {
    let dir = tempdir().unwrap();
    write_frames(dir.path(), 3);
    let frames = FrameSequence::from_dir(dir.path()).unwrap();

    let tools = Recognizer {
        seen: RefCell::new(Vec::new()),
        replies: vec!["a", "b", "c"],
    };
    let out = ocr::extract_text(&tools, &frames, &dir.path().join("scratch")).unwrap();

    assert_eq!(
        *tools.seen.borrow(),
        vec!["gray0001.png", "gray0002.png", "gray0003.png"]
    );
    assert_eq!(out.text, "a\n\nb\n\nc");
    // Scratch images are gone once the stage finishes.
    assert!(!dir.path().join("scratch").exists());
}

#[test]
fn unreadable_frame_is_recorded_and_does_not_abort_the_stage() {
    let dir = tempdir().unwrap();
    write_frames(dir.path(), 1);
    fs::write(dir.path().join("frame0002.png"), b"junk, not a png").unwrap();
    // Reuse a valid image for the third page.
    fs::copy(dir.path().join("frame0001.png"), dir.path().join("frame0003.png")).unwrap();
    let frames = FrameSequence::from_dir(dir.path()).unwrap();

    let tools = Recognizer {
        seen: RefCell::new(Vec::new()),
        replies: vec!["one", "never", "three"],
    };
    let out = ocr::extract_text(&tools, &frames, &dir.path().join("scratch")).unwrap();

    // Page 2 never reached the recognizer.
    assert_eq!(*tools.seen.borrow(), vec!["gray0001.png", "gray0003.png"]);
    assert_eq!(out.text, "one\n\nthree");
    assert_eq!(out.frames.len(), 3);
    assert!(!out.frames[1].ok);
    assert!(out.frames[1].error.as_deref().unwrap().contains("open image"));
}

#[test]
fn empty_recognition_is_ok_but_adds_no_separator() {
    let dir = tempdir().unwrap();
    write_frames(dir.path(), 3);
    let frames = FrameSequence::from_dir(dir.path()).unwrap();

    let tools = Recognizer {
        seen: RefCell::new(Vec::new()),
        replies: vec!["alpha\n", "", "gamma\n"],
    };
    let out = ocr::extract_text(&tools, &frames, &dir.path().join("scratch")).unwrap();

    assert_eq!(out.text, "alpha\n\ngamma");
    // Recognized-empty is distinguished from failed in the per-frame status.
    assert!(out.frames[1].ok);
    assert_eq!(out.frames[1].chars, 0);
}
