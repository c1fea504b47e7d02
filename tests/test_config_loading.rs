//! Tests for configuration loading, overrides and validation

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use bbs_fetch::config::{create_default_config, load_config, load_config_or_default};
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    let config_content = r#"
[upstream]
mirror_host = "mirror.example.net"
always_blocked = [".bbspink.com", ".example.org"]

[upstream.relay]
host = "127.0.0.1"
port = 8080

[limits]
request_timeout = 5
penalty_window = 120

[cache]
dir = "/tmp/bbs"

[placeholder]
site_name = "example"
"#;
    temp_file.write_all(config_content.as_bytes())?;
    temp_file.flush()?;

    let config = load_config(temp_file.path())?;

    assert_eq!(config.upstream.mirror_host, "mirror.example.net");
    assert_eq!(config.upstream.always_blocked.len(), 2);
    assert_eq!(config.upstream.urls().relay(), "127.0.0.1:8080/");
    assert_eq!(config.limits.request_timeout, Duration::from_secs(5));
    assert_eq!(config.limits.penalty_window, Duration::from_secs(120));
    assert_eq!(config.cache.dir.to_str(), Some("/tmp/bbs"));
    assert_eq!(config.placeholder.site_name, "example");
    // Unset values keep their defaults
    assert_eq!(config.upstream.menu_host, "menu.2ch.net");
    Ok(())
}

#[test]
fn test_invalid_toml_returns_error() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(b"this is not valid TOML [[[")?;
    temp_file.flush()?;

    let result = load_config(temp_file.path());
    assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(b"[limits]\nmax_payload = 0\n")?;
    temp_file.flush()?;

    assert!(load_config(temp_file.path()).is_err());
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let result = load_config("/nonexistent/bbs-fetch.toml");
    assert!(result.unwrap_err().to_string().contains("Failed to read"));
}

#[test]
fn test_missing_file_falls_back_to_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = load_config_or_default(dir.path().join("absent.toml"))?;
    assert_eq!(config.limits.max_payload, create_default_config().limits.max_payload);
    Ok(())
}
