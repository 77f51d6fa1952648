// crates/relay-cli/src/tests/logging.rs
// ============================================================================
// Module: CLI Logging Tests
// Description: Unit tests for log filter and format resolution.
// Purpose: Ensure logging settings resolve deterministically from raw values.
// Dependencies: relay-cli logging module
// ============================================================================

//! ## Overview
//! Exercises [`crate::logging::LogConfig::from_values`] without touching the
//! process environment or installing a global subscriber.

use crate::logging::DEFAULT_LOG_FILTER;
use crate::logging::LOG_FORMAT_ENV;
use crate::logging::LogConfig;
use crate::logging::LogFormat;
use crate::logging::LoggingError;

#[test]
fn defaults_apply_when_unset() {
    let config = LogConfig::from_values(None, None, None).unwrap();
    assert_eq!(config.filter, DEFAULT_LOG_FILTER);
    assert_eq!(config.format, LogFormat::Human);
}

#[test]
fn blank_filter_falls_back_to_default() {
    let config = LogConfig::from_values(Some("   "), None, None).unwrap();
    assert_eq!(config.filter, DEFAULT_LOG_FILTER);
}

#[test]
fn explicit_filter_is_trimmed() {
    let config = LogConfig::from_values(Some(" relay_config=debug "), None, None).unwrap();
    assert_eq!(config.filter, "relay_config=debug");
}

#[test]
fn format_parses_case_insensitively() {
    assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
    assert_eq!(LogFormat::parse(" human "), Some(LogFormat::Human));
    assert_eq!(LogFormat::parse("xml"), None);
}

#[test]
fn invalid_format_is_rejected() {
    let err = LogConfig::from_values(None, Some("xml"), None).unwrap_err();
    match err {
        LoggingError::InvalidFormat {
            env,
            value,
        } => {
            assert_eq!(env, LOG_FORMAT_ENV);
            assert_eq!(value, "xml");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn override_wins_over_environment_value() {
    let config = LogConfig::from_values(None, Some("xml"), Some(LogFormat::Json)).unwrap();
    assert_eq!(config.format, LogFormat::Json);
}
