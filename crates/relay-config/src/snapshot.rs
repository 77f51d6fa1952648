// crates/relay-config/src/snapshot.rs
// ============================================================================
// Module: Environment Snapshot
// Description: Point-in-time copy of raw environment variables.
// Purpose: Decouple validation from the live process environment.
// Dependencies: dotenvy, thiserror
// ============================================================================

//! ## Overview
//! Validation is a pure function of a schema and an [`EnvSnapshot`]. The
//! snapshot is taken once from the process environment (or built from pairs
//! in tests) and can be overlaid on a dotenv file. Variables already present
//! in the snapshot always win over file entries, and the process environment
//! is never modified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Raw value of one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// UTF-8 value.
    Text(String),
    /// Value that is not valid UTF-8.
    NotUnicode,
}

/// Errors raised while reading a dotenv file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The file does not exist.
    #[error("env file not found: {path}")]
    NotFound {
        /// Requested path.
        path: String,
    },
    /// The file could not be read or parsed.
    #[error("failed to read env file {path}: {reason}")]
    Read {
        /// Requested path.
        path: String,
        /// Failure detail.
        reason: String,
    },
}

/// Immutable copy of environment variables keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Variables keyed by name.
    vars: BTreeMap<String, RawValue>,
}

// ============================================================================
// SECTION: Construction
// ============================================================================

impl EnvSnapshot {
    /// Captures the current process environment.
    ///
    /// Variables whose names are not valid UTF-8 are skipped; they can never
    /// match a declared variable.
    #[must_use]
    pub fn from_process() -> Self {
        let mut vars = BTreeMap::new();
        for (name, value) in env::vars_os() {
            let Ok(name) = name.into_string() else {
                continue;
            };
            let value = value.into_string().map_or(RawValue::NotUnicode, RawValue::Text);
            vars.insert(name, value);
        }
        Self {
            vars,
        }
    }

    /// Builds a snapshot from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Inserts or replaces a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.vars.insert(name.into(), value);
    }

    /// Fills unset variables from the dotenv file at `path`.
    ///
    /// Returns the number of entries taken from the file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NotFound`] when the file does not exist and
    /// [`SnapshotError::Read`] when it cannot be read or parsed.
    pub fn overlay_dotenv(&mut self, path: &Path) -> Result<usize, SnapshotError> {
        let display = path.display().to_string();
        let entries = dotenvy::from_path_iter(path).map_err(|err| {
            if err.not_found() {
                SnapshotError::NotFound {
                    path: display.clone(),
                }
            } else {
                SnapshotError::Read {
                    path: display.clone(),
                    reason: err.to_string(),
                }
            }
        })?;
        let mut file_vars = Vec::new();
        for entry in entries {
            let (name, value) = entry.map_err(|err| SnapshotError::Read {
                path: display.clone(),
                reason: err.to_string(),
            })?;
            file_vars.push((name, value));
        }
        let mut applied = 0;
        for (name, value) in file_vars {
            if self.vars.contains_key(&name) {
                continue;
            }
            self.vars.insert(name, RawValue::Text(value));
            applied += 1;
        }
        Ok(applied)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(name, value)| (name.into(), RawValue::Text(value.into())))
            .collect();
        Self {
            vars,
        }
    }
}

// ============================================================================
// SECTION: Access
// ============================================================================

impl EnvSnapshot {
    /// Returns the raw value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.vars.get(name)
    }

    /// Returns the UTF-8 value for `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.vars.get(name) {
            Some(RawValue::Text(text)) => Some(text),
            Some(RawValue::NotUnicode) | None => None,
        }
    }

    /// Returns the number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true when no variables were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
