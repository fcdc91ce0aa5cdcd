use git_release::config::{load_config, Config};
use git_release::domain::Scheme;
use git_release::GitReleaseError;
use serial_test::serial;
use std::fs;

#[test]
fn test_load_config_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gitrelease.toml");
    fs::write(
        &path,
        r#"
            [version]
            scheme = "calver"
            tag_prefix = "api/v"
            calver_format = "2006.WW"

            [hotfix]
            branch_prefix = "release/"
            suffix = "patch"
        "#,
    )
    .unwrap();

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(config.version.scheme().unwrap(), Scheme::CalVer);
    assert_eq!(config.version.tag_prefix, "api/v");
    assert_eq!(config.version.calver_format, "2006.WW");
    assert_eq!(config.hotfix.branch_prefix, "release/");
    assert_eq!(config.hotfix.suffix, "patch");
}

#[test]
fn test_load_config_missing_explicit_path_fails() {
    let result = load_config(Some("/nonexistent/gitrelease.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_config_rejects_unknown_scheme() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gitrelease.toml");
    fs::write(&path, "[version]\nscheme = \"romver\"\n").unwrap();

    let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
    assert!(matches!(err, GitReleaseError::Scheme(_)));
}

#[test]
fn test_load_config_rejects_calver_without_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gitrelease.toml");
    fs::write(
        &path,
        "[version]\nscheme = \"calver\"\ncalver_format = \"\"\n",
    )
    .unwrap();

    let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
    assert!(matches!(err, GitReleaseError::Config(_)));
}

#[test]
fn test_load_config_rejects_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gitrelease.toml");
    fs::write(&path, "this is not toml [").unwrap();

    let err = load_config(Some(path.to_str().unwrap())).unwrap_err();
    assert!(matches!(err, GitReleaseError::Config(_)));
}

#[test]
#[serial]
fn test_load_config_from_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    fs::write(
        "gitrelease.toml",
        "[version]\nscheme = \"semver\"\ntag_prefix = \"rel-\"\n",
    )
    .unwrap();

    let result = load_config(None);
    std::env::set_current_dir(original).unwrap();

    let config = result.unwrap();
    assert_eq!(config.version.tag_prefix, "rel-");
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.version.scheme().unwrap(), Scheme::SemVer);
}
