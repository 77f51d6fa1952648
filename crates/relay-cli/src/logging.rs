// crates/relay-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Structured logging setup for the Relay API binary.
// Purpose: Route tracing events to stderr in human or JSON form.
// Dependencies: tracing-subscriber, thiserror
// ============================================================================

//! ## Overview
//! stdout is reserved for command payloads (JSON, Markdown, dotenv output);
//! every log event goes to stderr. The filter comes from `RELAY_LOG` and the
//! format from `RELAY_LOG_FORMAT` unless the CLI overrides it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::io::IsTerminal;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "RELAY_LOG";
/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "RELAY_LOG_FORMAT";
/// Filter used when `RELAY_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "relay_config=info,relay_cli=info,relay_api=info";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name (`human` or `json`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Some(Self::Human),
            "json" | "jsonl" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `RELAY_LOG_FORMAT` holds an unknown value.
    #[error("invalid {env} value: {value} (expected human or json)")]
    InvalidFormat {
        /// Environment variable name.
        env: &'static str,
        /// Raw value.
        value: String,
    },
    /// The filter directive could not be parsed.
    #[error("invalid log filter {filter}: {reason}")]
    InvalidFilter {
        /// Raw filter.
        filter: String,
        /// Parser detail.
        reason: String,
    },
    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    Init(String),
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl LogConfig {
    /// Reads logging settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidFormat`] when `RELAY_LOG_FORMAT` is not
    /// recognized and no override is given.
    pub fn from_env(format_override: Option<LogFormat>) -> Result<Self, LoggingError> {
        let filter = env::var(LOG_FILTER_ENV).ok();
        let format = env::var(LOG_FORMAT_ENV).ok();
        Self::from_values(filter.as_deref(), format.as_deref(), format_override)
    }

    /// Builds logging settings from raw values.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidFormat`] when `format` is not
    /// recognized and no override is given.
    pub fn from_values(
        filter: Option<&str>,
        format: Option<&str>,
        format_override: Option<LogFormat>,
    ) -> Result<Self, LoggingError> {
        let filter = filter
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_LOG_FILTER)
            .to_string();
        let format = match (format_override, format) {
            (Some(format), _) => format,
            (None, None) => LogFormat::default(),
            (None, Some(raw)) => LogFormat::parse(raw).ok_or_else(|| LoggingError::InvalidFormat {
                env: LOG_FORMAT_ENV,
                value: raw.to_string(),
            })?,
        };
        Ok(Self {
            filter,
            format,
        })
    }
}

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|err| LoggingError::InvalidFilter {
        filter: config.filter.clone(),
        reason: err.to_string(),
    })?;
    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Human => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(false))
            .try_init(),
    };
    result.map_err(|err| LoggingError::Init(err.to_string()))
}
