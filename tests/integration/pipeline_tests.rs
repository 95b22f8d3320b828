use super::fixtures;
use mediasweep::pipeline::{Pipeline, PipelineConfig, PipelineError};
use mediasweep::progress::SilentProgress;
use mediasweep::validation::InvalidReason;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(root: &Path) -> mediasweep::pipeline::PipelineSummary {
    Pipeline::new(PipelineConfig::for_root(root))
        .run(root, &SilentProgress)
        .unwrap()
}

#[test]
fn test_corrupt_and_duplicate_in_one_run() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let a = fixtures::jpeg(root, "a.jpg", [200, 10, 10]);
    fixtures::copy(&a, root, "b.jpg");
    fixtures::garbage(root, "c.png");

    let summary = run(root);

    assert_eq!(fixtures::names(&root.join("corrupted")), ["c.png"]);
    assert_eq!(fixtures::names(&root.join("duplicates")), ["b.jpg"]);
    assert!(root.join("a.jpg").exists());
    assert!(!root.join("b.jpg").exists());
    assert!(!root.join("c.png").exists());

    assert_eq!(summary.corruption.stats.examined, 3);
    assert_eq!(summary.corruption.stats.moved, 1);
    assert_eq!(summary.duplicates.stats.input_files, 2);
    assert_eq!(summary.duplicates.stats.moved, 1);
    assert_eq!(summary.duplicates.groups[0].keeper, root.join("a.jpg"));
    assert!(!summary.has_failures());
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    let summary = run(dir.path());

    assert_eq!(summary.corruption.stats.examined, 0);
    assert_eq!(summary.duplicates.stats.input_files, 0);
    assert_eq!(summary.total_moved(), 0);
    assert!(dir.path().join("corrupted").is_dir());
    assert!(dir.path().join("duplicates").is_dir());
}

#[test]
fn test_same_name_from_two_groups_gets_suffix() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for sub in ["a", "b", "x", "y"] {
        fs::create_dir(root.join(sub)).unwrap();
    }
    fixtures::png(&root.join("a"), "photo.png", [0, 0, 255]);
    fixtures::png(&root.join("b"), "photo.png", [0, 0, 255]);
    fixtures::png(&root.join("x"), "photo.png", [255, 0, 0]);
    fixtures::png(&root.join("y"), "photo.png", [255, 0, 0]);

    let summary = run(root);

    assert_eq!(summary.duplicates.stats.groups, 2);
    assert_eq!(
        fixtures::names(&root.join("duplicates")),
        ["photo.png", "photo_1.png"]
    );
    assert!(root.join("a/photo.png").exists());
    assert!(root.join("x/photo.png").exists());
}

#[test]
fn test_same_name_across_runs_gets_suffix() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for sub in ["a", "b", "c", "d"] {
        fs::create_dir(root.join(sub)).unwrap();
    }
    fixtures::png(&root.join("a"), "pic.png", [1, 2, 3]);
    fixtures::png(&root.join("b"), "pic.png", [1, 2, 3]);

    run(root);
    assert_eq!(fixtures::names(&root.join("duplicates")), ["pic.png"]);

    fixtures::png(&root.join("c"), "pic.png", [9, 9, 9]);
    fixtures::png(&root.join("d"), "pic.png", [9, 9, 9]);

    run(root);

    assert_eq!(
        fixtures::names(&root.join("duplicates")),
        ["pic.png", "pic_1.png"]
    );
    assert!(root.join("a/pic.png").exists());
    assert!(root.join("c/pic.png").exists());
}

#[test]
fn test_audio_validation() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fixtures::mp3(root, "song.mp3");
    fs::write(root.join("broken.mp3"), b"ID3\x03\x00").unwrap();

    let summary = run(root);

    assert!(root.join("song.mp3").exists());
    assert_eq!(fixtures::names(&root.join("corrupted")), ["broken.mp3"]);
    assert!(matches!(
        summary.corruption.quarantined[0].reason,
        InvalidReason::UnparseableAudio(_)
    ));
}

#[test]
fn test_second_run_moves_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let a = fixtures::jpeg(root, "a.jpg", [5, 5, 5]);
    fixtures::copy(&a, root, "b.jpg");
    fixtures::garbage(root, "c.jpg");

    let first = run(root);
    assert_eq!(first.total_moved(), 2);

    let second = run(root);

    assert_eq!(second.total_moved(), 0);
    assert_eq!(second.corruption.stats.examined, 1);
    assert!(second.duplicates.found_no_duplicates());
    assert_eq!(fixtures::names(&root.join("duplicates")), ["b.jpg"]);
    assert_eq!(fixtures::names(&root.join("corrupted")), ["c.jpg"]);
}

#[test]
fn test_exactly_one_keeper_per_group() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("sub")).unwrap();
    let original = fixtures::png(&root.join("sub"), "m.png", [7, 7, 7]);
    fixtures::copy(&original, root, "z.png");
    fixtures::copy(&original, root, "B.PNG");

    let summary = run(root);

    let group = &summary.duplicates.groups[0];
    assert_eq!(group.keeper, root.join("B.PNG"));
    assert_eq!(group.moves.success_count(), 2);
    assert!(root.join("B.PNG").exists());
    assert!(!root.join("z.png").exists());
    assert!(!root.join("sub/m.png").exists());
    assert_eq!(fixtures::names(&root.join("duplicates")), ["m.png", "z.png"]);
}

#[test]
fn test_corrupted_files_are_not_duplicates() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fixtures::garbage(root, "bad1.jpg");
    fixtures::garbage(root, "bad2.jpg");

    let summary = run(root);

    assert_eq!(
        fixtures::names(&root.join("corrupted")),
        ["bad1.jpg", "bad2.jpg"]
    );
    assert!(fixtures::names(&root.join("duplicates")).is_empty());
    assert!(summary.duplicates.had_no_files());
}

#[test]
fn test_unsupported_files_untouched() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("notes.txt"), b"same").unwrap();
    fs::write(root.join("copy.txt"), b"same").unwrap();
    fs::write(root.join("clip.gif"), b"GIF89a broken").unwrap();

    let summary = run(root);

    assert_eq!(summary.total_moved(), 0);
    assert_eq!(summary.corruption.stats.examined, 0);
    assert_eq!(
        fixtures::names(root),
        ["clip.gif", "copy.txt", "corrupted", "duplicates", "notes.txt"]
    );
}

#[test]
fn test_missing_root_moves_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("nope");

    let err = Pipeline::new(PipelineConfig::for_root(&root))
        .run(&root, &SilentProgress)
        .unwrap_err();

    assert!(matches!(err, PipelineError::RootNotFound(_)));
    assert!(fixtures::names(dir.path()).is_empty());
}

#[test]
fn test_destinations_outside_root() {
    let dir = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    let root = dir.path();
    let a = fixtures::png(root, "a.png", [3, 3, 3]);
    fixtures::copy(&a, root, "b.png");
    fixtures::garbage(root, "c.png");

    let mut config = PipelineConfig::for_root(root);
    config.corrupted_dir = elsewhere.path().join("bad");
    config.duplicates_dir = elsewhere.path().join("dups");
    Pipeline::new(config).run(root, &SilentProgress).unwrap();

    assert_eq!(fixtures::names(root), ["a.png"]);
    assert_eq!(fixtures::names(&elsewhere.path().join("bad")), ["c.png"]);
    assert_eq!(fixtures::names(&elsewhere.path().join("dups")), ["b.png"]);
}

#[test]
fn test_truncated_png_quarantined_by_default() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let png = fixtures::gradient_png(root, "cut.png");
    let bytes = fs::read(&png).unwrap();
    fs::write(&png, &bytes[..bytes.len() / 2]).unwrap();
    fixtures::copy(&png, root, "cut_copy.png");

    let summary = run(root);

    assert_eq!(summary.corruption.stats.invalid, 2);
    assert_eq!(
        fixtures::names(&root.join("corrupted")),
        ["cut.png", "cut_copy.png"]
    );
    assert!(summary.duplicates.had_no_files());
}
