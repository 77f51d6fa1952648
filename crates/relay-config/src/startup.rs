// crates/relay-config/src/startup.rs
// ============================================================================
// Module: Startup Loader
// Description: One-shot environment validation at process boot.
// Purpose: Fail closed before any dependent subsystem is constructed.
// Dependencies: tracing, thiserror
// ============================================================================

//! ## Overview
//! The startup loader captures the process environment once, overlays the
//! optional dotenv file, validates the result, and returns an immutable,
//! shareable [`ResolvedConfig`]. Callers pass that value explicitly to every
//! component they construct afterwards; there is no process-wide global.
//!
//! Every failure is fatal: the caller is expected to report the error and
//! exit without starting the HTTP listener or the Slack client.
//!
//! ## Invariants
//! - Validation runs exactly once per [`StartupLoader::load`] call.
//! - Process variables take precedence over dotenv file entries.
//! - Secret values never appear in log events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::api_env::ApiEnv;
use crate::error::ConfigValidationError;
use crate::error::Violation;
use crate::resolved::ResolvedConfig;
use crate::rules::EnvSchema;
use crate::snapshot::EnvSnapshot;
use crate::snapshot::SnapshotError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Dotenv file read from the working directory unless disabled.
pub const DEFAULT_ENV_FILE: &str = ".env";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Dotenv file selection for startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvFile {
    /// Read `.env` from the working directory when it exists.
    #[default]
    Default,
    /// Read the given file; a missing file is an error.
    Path(PathBuf),
    /// Use the process environment only.
    Disabled,
}

/// Startup failures. All of them abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    /// The dotenv file could not be used.
    #[error(transparent)]
    EnvFile(#[from] SnapshotError),
    /// The environment failed validation.
    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
}

impl StartupError {
    /// Returns validation violations, or an empty slice for file errors.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(err) => err.violations(),
            Self::EnvFile(_) => &[],
        }
    }
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Validates the process environment against a schema at boot.
#[derive(Debug, Clone, Default)]
pub struct StartupLoader {
    /// Rule table to enforce.
    schema: EnvSchema,
    /// Dotenv file selection.
    env_file: EnvFile,
}

impl StartupLoader {
    /// Creates a loader for `schema` using the default dotenv selection.
    #[must_use]
    pub fn new(schema: EnvSchema) -> Self {
        Self {
            schema,
            env_file: EnvFile::Default,
        }
    }

    /// Overrides the dotenv file selection.
    #[must_use]
    pub fn with_env_file(mut self, env_file: EnvFile) -> Self {
        self.env_file = env_file;
        self
    }

    /// Returns the schema this loader enforces.
    #[must_use]
    pub const fn schema(&self) -> &EnvSchema {
        &self.schema
    }

    /// Captures the process environment and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] when the dotenv file cannot be used or the
    /// environment is invalid.
    pub fn load(&self) -> Result<Arc<ResolvedConfig>, StartupError> {
        let snapshot = self.snapshot(EnvSnapshot::from_process())?;
        self.resolve(&snapshot)
    }

    /// Overlays the selected dotenv file on `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::EnvFile`] when an explicit file is missing or
    /// any selected file cannot be parsed.
    pub fn snapshot(&self, mut snapshot: EnvSnapshot) -> Result<EnvSnapshot, StartupError> {
        match &self.env_file {
            EnvFile::Disabled => {}
            EnvFile::Default => match snapshot.overlay_dotenv(Path::new(DEFAULT_ENV_FILE)) {
                Ok(applied) => debug!(path = DEFAULT_ENV_FILE, applied, "env file loaded"),
                Err(SnapshotError::NotFound {
                    ..
                }) => debug!(path = DEFAULT_ENV_FILE, "env file not present"),
                Err(err) => return Err(log_failure(err.into())),
            },
            EnvFile::Path(path) => {
                let applied =
                    snapshot.overlay_dotenv(path).map_err(|err| log_failure(err.into()))?;
                debug!(path = %path.display(), applied, "env file loaded");
            }
        }
        Ok(snapshot)
    }

    /// Validates an already captured snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Validation`] listing every violation.
    pub fn resolve(&self, snapshot: &EnvSnapshot) -> Result<Arc<ResolvedConfig>, StartupError> {
        let config = self.schema.validate(snapshot).map_err(|err| log_failure(err.into()))?;
        info!(variables = config.len(), "environment validated");
        debug!(config = %config.redacted(), "resolved environment");
        Ok(Arc::new(config))
    }
}

/// Logs a startup failure before it is returned.
fn log_failure(err: StartupError) -> StartupError {
    match &err {
        StartupError::EnvFile(file_err) => error!(error = %file_err, "env file rejected"),
        StartupError::Validation(validation) => {
            for violation in validation.violations() {
                error!(
                    variable = %violation.variable,
                    code = violation.kind.code(),
                    reason = %violation.kind,
                    "environment violation"
                );
            }
        }
    }
    err
}

// ============================================================================
// SECTION: Relay API Boot
// ============================================================================

/// Validated Relay API configuration handed to every collaborator.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Resolved configuration shared by reference.
    pub config: Arc<ResolvedConfig>,
    /// Typed collaborator settings.
    pub env: ApiEnv,
}

/// Runs the Relay API startup sequence against the process environment.
///
/// # Errors
///
/// Returns [`StartupError`] when the environment cannot be loaded or fails
/// validation.
pub fn boot(env_file: EnvFile) -> Result<Bootstrap, StartupError> {
    let loader = StartupLoader::new(EnvSchema::api()).with_env_file(env_file);
    let snapshot = loader.snapshot(EnvSnapshot::from_process())?;
    boot_from(&loader, &snapshot)
}

/// Runs the Relay API startup sequence against an explicit snapshot.
///
/// # Errors
///
/// Returns [`StartupError`] when the snapshot fails validation.
pub fn boot_from(loader: &StartupLoader, snapshot: &EnvSnapshot) -> Result<Bootstrap, StartupError> {
    let config = loader.resolve(snapshot)?;
    let env = ApiEnv::from_resolved(&config).map_err(|err| log_failure(err.into()))?;
    if env.missing_production_signing_secret() {
        warn!("SLACK_SIGNING_SECRET is unset in production; Slack request signatures cannot be verified");
    }
    info!(
        environment = %env.http.environment,
        port = env.http.port,
        public_api_base = %env.public_api_base,
        "startup configuration ready"
    );
    Ok(Bootstrap {
        config,
        env,
    })
}
