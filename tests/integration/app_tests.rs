//! End-to-end runs through `run_app`, checking exit codes and the tree left
//! behind. Reports go to stdout and are not captured here.

use super::fixtures::{self, env_lock};
use clap::Parser;
use mediasweep::cli::Cli;
use mediasweep::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Arguments that keep a test run independent of the user's config file.
fn cli(root: &Path, config_dir: &TempDir, extra: &[&str]) -> Cli {
    let config = config_dir.path().join("mediasweep.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut args = vec![
        "mediasweep".to_string(),
        root.to_string_lossy().into_owned(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
        "--no-progress".to_string(),
        "--no-color".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_exit_code_success() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    let a = fixtures::png(dir.path(), "a.png", [1, 1, 1]);
    fixtures::copy(&a, dir.path(), "b.png");
    fixtures::garbage(dir.path(), "c.jpg");

    let code = mediasweep::run_app(cli(dir.path(), &config_dir, &["--output", "json"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fixtures::names(&dir.path().join("duplicates")), ["b.png"]);
    assert_eq!(fixtures::names(&dir.path().join("corrupted")), ["c.jpg"]);
}

#[test]
fn test_exit_code_success_text_output() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    fixtures::mp3(dir.path(), "track.mp3");

    let code = mediasweep::run_app(cli(dir.path(), &config_dir, &["-q"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("track.mp3").exists());
}

#[test]
fn test_missing_root_is_input_error() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    let root = dir.path().join("missing");

    let err = mediasweep::run_app(cli(&root, &config_dir, &[])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::InputError);
    assert!(err.to_string().contains("Path not found"));
}

#[test]
fn test_file_root_is_input_error() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    let file = fixtures::png(dir.path(), "one.png", [0, 0, 0]);

    let err = mediasweep::run_app(cli(&file, &config_dir, &[])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::InputError);
    assert!(file.exists());
}

#[test]
fn test_missing_config_file_is_general_error() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let parsed = Cli::try_parse_from([
        "mediasweep",
        dir.path().to_str().unwrap(),
        "--config",
        dir.path().join("nope.toml").to_str().unwrap(),
    ])
    .unwrap();

    let err = mediasweep::run_app(parsed).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
}

#[test]
fn test_relative_destinations_resolve_against_root() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    fs::write(
        config_dir.path().join("mediasweep.toml"),
        "corrupted_dir = \"trash/bad\"\n",
    )
    .unwrap();
    fixtures::garbage(dir.path(), "x.png");
    let a = fixtures::jpeg(dir.path(), "a.jpg", [9, 8, 7]);
    fixtures::copy(&a, dir.path(), "b.jpg");

    let code = mediasweep::run_app(cli(
        dir.path(),
        &config_dir,
        &["--duplicates-dir", "trash/dups", "--output", "json"],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fixtures::names(&dir.path().join("trash/bad")), ["x.png"]);
    assert_eq!(fixtures::names(&dir.path().join("trash/dups")), ["b.jpg"]);
    assert!(!dir.path().join("corrupted").exists());
}

#[test]
fn test_same_destination_is_general_error() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    fixtures::garbage(dir.path(), "x.png");

    let err = mediasweep::run_app(cli(
        dir.path(),
        &config_dir,
        &["--corrupted-dir", "out", "--duplicates-dir", "out"],
    ))
    .unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
    assert!(dir.path().join("x.png").exists());
}

#[test]
fn test_root_as_destination_is_general_error() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    let a = fixtures::png(dir.path(), "a.png", [4, 4, 4]);
    fixtures::copy(&a, dir.path(), "b.png");

    let err = mediasweep::run_app(cli(dir.path(), &config_dir, &["--duplicates-dir", "."]))
        .unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
    assert_eq!(fixtures::names(dir.path()), ["a.png", "b.png"]);
}

#[cfg(unix)]
#[test]
fn test_exit_code_partial_success_on_locked_destination() {
    use std::os::unix::fs::PermissionsExt;

    let _guard = env_lock();
    let dir = tempdir().unwrap();
    let config_dir = tempdir().unwrap();
    let a = fixtures::png(dir.path(), "a.png", [4, 4, 4]);
    fixtures::copy(&a, dir.path(), "b.png");

    let locked = dir.path().join("duplicates");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions
    let probe = locked.join("probe");
    if fs::write(&probe, b"").is_ok() {
        fs::remove_file(&probe).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let code = mediasweep::run_app(cli(dir.path(), &config_dir, &["--output", "json"])).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert!(dir.path().join("a.png").exists());
    assert!(dir.path().join("b.png").exists());
}
