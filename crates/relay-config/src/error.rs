// crates/relay-config/src/error.rs
// ============================================================================
// Module: Environment Errors
// Description: Violation records and error types for environment validation.
// Purpose: Report every broken rule at once, without leaking secret values.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Validation never stops at the first problem: each broken rule becomes a
//! [`Violation`] and the full list is carried by [`ConfigValidationError`].
//! Values attached to violations of secret rules are masked before they are
//! stored, so rendering an error is always safe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use thiserror::Error;

use crate::rules::EnvRule;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder shown instead of secret values.
pub const REDACTED: &str = "***";

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Reason a single variable failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    /// Required variable is not set.
    #[error("is required but not set")]
    Missing,
    /// Variable is set to an empty string.
    #[error("must not be empty")]
    Empty,
    /// Variable value is not valid UTF-8.
    #[error("must be valid UTF-8")]
    NotUnicode,
    /// Value could not be parsed as a finite number.
    #[error("must be a number (got \"{value}\")")]
    NotANumber {
        /// Raw value as provided.
        value: String,
    },
    /// Number is not an integer within the accepted range.
    #[error("must be an integer between {min} and {max} (got {value})")]
    OutOfRange {
        /// Raw value as provided.
        value: String,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },
    /// Value is outside the allowed set.
    #[error("must be one of [{allowed}] (got \"{value}\")")]
    NotAllowed {
        /// Raw value as provided.
        value: String,
        /// Comma-separated allowed values.
        allowed: String,
    },
    /// Value is not a well-formed absolute URI.
    #[error("must be a well-formed URI (got \"{value}\": {reason})")]
    MalformedUri {
        /// Raw value as provided.
        value: String,
        /// Parser failure detail.
        reason: String,
    },
}

impl ViolationKind {
    /// Returns a stable code for structured reporting.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::NotUnicode => "not_unicode",
            Self::NotANumber {
                ..
            } => "not_a_number",
            Self::OutOfRange {
                ..
            } => "out_of_range",
            Self::NotAllowed {
                ..
            } => "not_allowed",
            Self::MalformedUri {
                ..
            } => "malformed_uri",
        }
    }

    /// Replaces any captured raw value with [`REDACTED`].
    #[must_use]
    pub fn redacted(self) -> Self {
        match self {
            Self::NotANumber {
                ..
            } => Self::NotANumber {
                value: REDACTED.to_string(),
            },
            Self::OutOfRange {
                min,
                max,
                ..
            } => Self::OutOfRange {
                value: REDACTED.to_string(),
                min,
                max,
            },
            Self::NotAllowed {
                allowed,
                ..
            } => Self::NotAllowed {
                value: REDACTED.to_string(),
                allowed,
            },
            Self::MalformedUri {
                reason,
                ..
            } => Self::MalformedUri {
                value: REDACTED.to_string(),
                reason,
            },
            other => other,
        }
    }
}

/// A broken rule for one variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{variable} {kind}")]
pub struct Violation {
    /// Variable name.
    pub variable: String,
    /// Failure reason.
    pub kind: ViolationKind,
}

impl Violation {
    /// Creates a violation for `rule`, masking raw values of secret rules.
    #[must_use]
    pub fn for_rule(rule: &EnvRule, kind: ViolationKind) -> Self {
        let kind = if rule.secret { kind.redacted() } else { kind };
        Self {
            variable: rule.name.to_string(),
            kind,
        }
    }
}

// ============================================================================
// SECTION: Validation Error
// ============================================================================

/// Environment failed validation; carries every violation in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_violations(.violations))]
pub struct ConfigValidationError {
    /// Violations in schema order.
    violations: Vec<Violation>,
}

impl ConfigValidationError {
    /// Wraps a list of violations.
    #[must_use]
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self {
            violations,
        }
    }

    /// Returns all violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the names of the offending variables, in order.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        self.violations.iter().map(|violation| violation.variable.as_str()).collect()
    }

    /// Consumes the error and returns the violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Renders the operator-facing violation list.
fn render_violations(violations: &[Violation]) -> String {
    let mut out = format!("invalid environment: {} violation(s)", violations.len());
    for violation in violations {
        let _ = write!(&mut out, "\n  - {violation}");
    }
    out
}

// ============================================================================
// SECTION: Schema Errors
// ============================================================================

/// Rule table failed its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A rule has an empty name.
    #[error("rule name must be non-empty")]
    EmptyName,
    /// A variable is declared more than once.
    #[error("variable declared more than once: {0}")]
    DuplicateName(String),
    /// A constraint cannot apply to the rule kind.
    #[error("constraint does not fit value kind for {0}")]
    ConstraintMismatch(String),
    /// A required rule declares a default.
    #[error("required variable {0} cannot have a default")]
    RequiredWithDefault(String),
    /// A default does not satisfy its own rule.
    #[error("invalid default for {name}: {reason}")]
    InvalidDefault {
        /// Variable name.
        name: String,
        /// Failure detail.
        reason: String,
    },
}
