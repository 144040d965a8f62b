use vid2pdf::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../vid2pdf.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.compile.density, 300);
    assert_eq!(cfg.compile.pdf_filename, "output.pdf");
    assert_eq!(cfg.ocr.text_filename, "output.md");
    assert!(!cfg.paths.work_dir.is_empty());
}

#[test]
fn defaults_match_example() {
    let cfg = Config::default();
    assert_eq!(cfg.compile.density, 300);
    assert_eq!(cfg.extraction.default_interval, 0.5);
    assert_eq!(cfg.tools.ffmpeg, "ffmpeg");
    assert!(!cfg.global.keep_frames);
}
