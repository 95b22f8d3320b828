use super::fixtures::env_lock;
use clap::Parser;
use mediasweep::cli::Cli;
use mediasweep::config::{Config, ConfigError};
use mediasweep::validation::ValidationDepth;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn clear_env() {
    for key in [
        "MEDIASWEEP_CORRUPTED_DIR",
        "MEDIASWEEP_DUPLICATES_DIR",
        "MEDIASWEEP_FOLLOW_SYMLINKS",
        "MEDIASWEEP_SKIP_HIDDEN",
        "MEDIASWEEP_VALIDATION",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_config_load_from_toml() {
    let _guard = env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("mediasweep.toml");
    fs::write(
        &config_path,
        r#"
corrupted_dir = "/mnt/bad"
duplicates_dir = "dups"
skip_hidden = true
validation = "full"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.corrupted_dir, Some(PathBuf::from("/mnt/bad")));
    assert_eq!(config.duplicates_dir, Some(PathBuf::from("dups")));
    assert!(config.skip_hidden);
    assert!(!config.follow_symlinks);
    assert_eq!(config.validation, ValidationDepth::Full);
}

#[test]
fn test_config_env_overrides_file() {
    let _guard = env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("mediasweep.toml");
    fs::write(&config_path, "validation = \"full\"\nskip_hidden = true\n").unwrap();

    std::env::set_var("MEDIASWEEP_VALIDATION", "header");
    std::env::set_var("MEDIASWEEP_DUPLICATES_DIR", "copies");
    let config = Config::load(Some(&config_path));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.validation, ValidationDepth::Header);
    assert_eq!(config.duplicates_dir, Some(PathBuf::from("copies")));
    assert!(config.skip_hidden);
}

#[test]
fn test_config_cli_overrides_env() {
    let _guard = env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "").unwrap();

    std::env::set_var("MEDIASWEEP_CORRUPTED_DIR", "from-env");
    let config = Config::load(Some(&config_path));
    clear_env();

    let mut config = config.unwrap();
    let cli = Cli::try_parse_from(["mediasweep", "/photos", "--corrupted-dir", "from-cli"]).unwrap();
    config.apply_cli(&cli);

    let pipeline = config.pipeline_config(Path::new("/photos"));
    assert_eq!(pipeline.corrupted_dir, PathBuf::from("/photos/from-cli"));
    assert_eq!(pipeline.duplicates_dir, PathBuf::from("/photos/duplicates"));
}

#[test]
fn test_config_invalid_value() {
    let _guard = env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "validation = \"thorough\"\n").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_config_malformed_toml() {
    let _guard = env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "validation = [unclosed").unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_config_missing_default_file_is_fine() {
    let _guard = env_lock();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
}
