// harsan-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use harsan_core::config::{self, SanitizerConfig, ScrubStrategy, SESSION_COOKIES};
use harsan_core::HarError;

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
sensitive_headers:
  - X-Api-Key
session_cookies:
  - PHPSESSID
scrub: mask
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = SanitizerConfig::load_from_file(file.path())?;
    assert_eq!(config.sensitive_headers, vec!["X-Api-Key".to_string()]);
    assert_eq!(config.session_cookies, vec!["PHPSESSID".to_string()]);
    assert_eq!(config.scrub, ScrubStrategy::Mask);
    assert!(!config.case_insensitive_headers);
    Ok(())
}

#[test]
fn test_load_from_file_missing_keys_take_defaults() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"case_insensitive_headers: true\n")?;
    let config = SanitizerConfig::load_from_file(file.path())?;
    assert_eq!(config.session_cookies.len(), SESSION_COOKIES.len());
    assert!(config.case_insensitive_headers);
    assert_eq!(config.scrub, ScrubStrategy::Sentinel);
    Ok(())
}

#[test]
fn test_load_from_file_rejects_bad_yaml() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"session_cookies: {not: [a list\n")?;
    let err = SanitizerConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, HarError::Config(_)));
    Ok(())
}

#[test]
fn test_load_from_missing_file_is_io_error() {
    let err = SanitizerConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, HarError::Io(_)));
}

#[test]
fn test_merge_config_no_user_config() {
    let merged = config::merge_config(SanitizerConfig::default(), None);
    assert_eq!(merged, SanitizerConfig::default());
}

#[test]
fn test_merge_config_extends_defaults() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"sensitive_headers: [X-Api-Key]\nsession_cookies: [PHPSESSID]\n")?;
    let user = SanitizerConfig::load_from_file(file.path())?;
    let merged = config::merge_config(SanitizerConfig::default(), Some(user));

    assert!(merged.is_sensitive_header("Authorization"));
    assert!(merged.is_sensitive_header("X-Api-Key"));
    assert!(merged.is_session_cookie("sid"));
    assert!(merged.is_session_cookie("PHPSESSID"));
    Ok(())
}
