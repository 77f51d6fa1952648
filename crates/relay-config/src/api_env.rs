// crates/relay-config/src/api_env.rs
// ============================================================================
// Module: Relay API Settings
// Description: Typed collaborator settings derived from a resolved config.
// Purpose: Hand each subsystem exactly the settings it consumes.
// Dependencies: serde, url
// ============================================================================

//! ## Overview
//! [`ApiEnv`] is the typed face of the Relay API environment. It is built
//! once from a [`ResolvedConfig`] and split into per-collaborator settings:
//! the HTTP listener takes [`HttpSettings`], the Slack client takes
//! [`SlackCredentials`], and consumers of the public base URL take a [`Url`].
//! Credentials are wrapped in [`Secret`] so they cannot leak through `Debug`.
//!
//! `PORT` is any finite number in the environment contract; it must also be
//! an integer in `0..=65535` here, because the listener binds a `u16`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::ConfigValidationError;
use crate::error::REDACTED;
use crate::error::Violation;
use crate::error::ViolationKind;
use crate::resolved::ResolvedConfig;
use crate::rules::MAX_PORT;
use crate::rules::NEXT_PUBLIC_API_BASE;
use crate::rules::NODE_ENV;
use crate::rules::NODE_ENV_VALUES;
use crate::rules::PORT;
use crate::rules::SLACK_APP_TOKEN;
use crate::rules::SLACK_BOT_TOKEN;
use crate::rules::SLACK_SIGNING_SECRET;

// ============================================================================
// SECTION: Node Environment
// ============================================================================

/// Runtime environment selected by `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeEnv {
    /// Local development.
    Development,
    /// Production deployment.
    Production,
    /// Automated tests.
    Test,
}

impl NodeEnv {
    /// Parses an exact `NODE_ENV` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for NodeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Secret
// ============================================================================

/// Credential value that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a credential.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw credential for handing to the consuming client.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

// ============================================================================
// SECTION: Collaborator Settings
// ============================================================================

/// Settings consumed by the HTTP listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Runtime environment.
    pub environment: NodeEnv,
    /// Listener port.
    pub port: u16,
}

/// Credentials consumed by the Slack client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackCredentials {
    /// App-level token.
    pub app_token: Secret,
    /// Bot token.
    pub bot_token: Secret,
    /// Request signing secret, when configured.
    pub signing_secret: Option<Secret>,
}

/// Typed Relay API environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEnv {
    /// HTTP listener settings.
    pub http: HttpSettings,
    /// Slack credentials.
    pub slack: SlackCredentials,
    /// Public base URL of the API.
    pub public_api_base: Url,
}

impl ApiEnv {
    /// Builds typed settings from a config resolved with the Relay API schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] when the config was resolved with a
    /// schema that does not provide the Relay API variables.
    pub fn from_resolved(config: &ResolvedConfig) -> Result<Self, ConfigValidationError> {
        let mut violations = Vec::new();
        let environment = capture(&mut violations, NODE_ENV, node_env(config));
        let port = capture(&mut violations, PORT, port(config));
        let app_token = capture(&mut violations, SLACK_APP_TOKEN, secret(config, SLACK_APP_TOKEN));
        let bot_token = capture(&mut violations, SLACK_BOT_TOKEN, secret(config, SLACK_BOT_TOKEN));
        let public_api_base =
            capture(&mut violations, NEXT_PUBLIC_API_BASE, public_api_base(config));
        let signing_secret = config.text(SLACK_SIGNING_SECRET).map(Secret::new);

        match (environment, port, app_token, bot_token, public_api_base) {
            (
                Some(environment),
                Some(port),
                Some(app_token),
                Some(bot_token),
                Some(public_api_base),
            ) => Ok(Self {
                http: HttpSettings {
                    environment,
                    port,
                },
                slack: SlackCredentials {
                    app_token,
                    bot_token,
                    signing_secret,
                },
                public_api_base,
            }),
            _ => Err(ConfigValidationError::new(violations)),
        }
    }

    /// Returns true when Slack requests cannot be signature-verified in production.
    #[must_use]
    pub const fn missing_production_signing_secret(&self) -> bool {
        matches!(self.http.environment, NodeEnv::Production) && self.slack.signing_secret.is_none()
    }
}

// ============================================================================
// SECTION: Field Extraction
// ============================================================================

/// Records a failed extraction and yields the value on success.
fn capture<T>(
    violations: &mut Vec<Violation>,
    variable: &str,
    result: Result<T, ViolationKind>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(kind) => {
            violations.push(Violation {
                variable: variable.to_string(),
                kind,
            });
            None
        }
    }
}

/// Extracts `NODE_ENV`.
fn node_env(config: &ResolvedConfig) -> Result<NodeEnv, ViolationKind> {
    let value = config.text(NODE_ENV).ok_or(ViolationKind::Missing)?;
    NodeEnv::parse(value).ok_or_else(|| ViolationKind::NotAllowed {
        value: value.to_string(),
        allowed: NODE_ENV_VALUES.join(", "),
    })
}

/// Extracts `PORT` as a listener port.
fn port(config: &ResolvedConfig) -> Result<u16, ViolationKind> {
    let value = config.number(PORT).ok_or(ViolationKind::Missing)?;
    // -0 renders with a sign and would not parse as u16.
    let rendered = if value == 0.0 { "0".to_string() } else { value.to_string() };
    rendered.parse::<u16>().map_err(|_| ViolationKind::OutOfRange {
        value: rendered,
        min: 0,
        max: MAX_PORT,
    })
}

/// Extracts a required credential.
fn secret(config: &ResolvedConfig, name: &str) -> Result<Secret, ViolationKind> {
    config.text(name).map(Secret::new).ok_or(ViolationKind::Missing)
}

/// Extracts `NEXT_PUBLIC_API_BASE` as a parsed URL.
fn public_api_base(config: &ResolvedConfig) -> Result<Url, ViolationKind> {
    let value = config.text(NEXT_PUBLIC_API_BASE).ok_or(ViolationKind::Missing)?;
    Url::parse(value).map_err(|err| ViolationKind::MalformedUri {
        value: value.to_string(),
        reason: err.to_string(),
    })
}
