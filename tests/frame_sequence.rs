use std::fs;
use tempfile::tempdir;
use vid2pdf::extract::FrameSequence;

fn names(seq: &FrameSequence) -> Vec<String> {
    seq.paths()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn orders_lexicographically_regardless_of_creation_order() {
    let dir = tempdir().unwrap();
    for name in ["frame0003.png", "frame0010.png", "frame0001.png", "frame0002.png"] {
        fs::write(dir.path().join(name), b"img").unwrap();
    }

    let seq = FrameSequence::from_dir(dir.path()).unwrap();
    assert_eq!(
        names(&seq),
        vec!["frame0001.png", "frame0002.png", "frame0003.png", "frame0010.png"]
    );
}

#[test]
fn ignores_files_outside_the_naming_scheme() {
    let dir = tempdir().unwrap();
    for name in [
        "frame0001.png",
        "frame12.png",     // not zero-padded to 4 digits
        "frame0002.txt",   // wrong extension
        "thumb.png",
        "notes.md",
    ] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }

    let seq = FrameSequence::from_dir(dir.path()).unwrap();
    assert_eq!(names(&seq), vec!["frame0001.png"]);
}

#[test]
fn empty_dir_yields_empty_sequence() {
    let dir = tempdir().unwrap();
    let seq = FrameSequence::from_dir(dir.path()).unwrap();
    assert!(seq.is_empty());
    assert_eq!(seq.len(), 0);
}
