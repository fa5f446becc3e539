use auditchain::config::ClientConfig;
use auditchain::ChainError;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("auditchain.toml");
    fs::write(
        &path,
        r#"
base_url = "http://127.0.0.1:8080/api"
timeout_secs = 5
page_size = 100

[retry]
max_retries = 1
backoff_ms = 10
max_backoff_ms = 10
"#,
    )
    .unwrap();

    let config = ClientConfig::from_file(&path).unwrap();
    assert_eq!(config.base_url, "http://127.0.0.1:8080/api");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.page_size, 100);
    assert_eq!(config.retry.max_retries, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_reports_source_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "page_size = 7\n").unwrap();

    let (config, source) = ClientConfig::load(Some(&path)).unwrap();
    assert_eq!(config.page_size, 7);
    assert_eq!(source, Some(path));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = ClientConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ChainError::Config(_)));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "page_size = \"lots\"\n").unwrap();

    let err = ClientConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_written_config_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("auditchain.toml");
    let config = ClientConfig::default().with_api_key("proj-key");

    fs::write(&path, config.to_toml_string().unwrap()).unwrap();
    assert_eq!(ClientConfig::from_file(&path).unwrap(), config);
}
