// crates/relay-config/src/rules.rs
// ============================================================================
// Module: Environment Rules
// Description: Declarative rule table for the Relay API environment.
// Purpose: Define every recognized variable, its type, default, and status.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The environment contract is data, not code: [`API_ENV_RULES`] lists each
//! recognized variable once, in a stable order, and [`EnvSchema`] wraps such a
//! table after checking its own invariants. The validator in
//! [`crate::validate`] interprets the table generically.
//!
//! ## Invariants
//! - Every variable name appears exactly once.
//! - Defaults satisfy the kind and constraint of their own rule.
//! - Required rules never carry a default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::SchemaError;
use crate::error::ViolationKind;
use crate::resolved::ConfigValue;
use crate::validate::check_constraint;

// ============================================================================
// SECTION: Variable Names
// ============================================================================

/// Runtime environment selector.
pub const NODE_ENV: &str = "NODE_ENV";
/// HTTP listener port.
pub const PORT: &str = "PORT";
/// Slack app-level token (socket mode).
pub const SLACK_APP_TOKEN: &str = "SLACK_APP_TOKEN";
/// Slack bot token.
pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
/// Slack request signing secret.
pub const SLACK_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";
/// Public base URL of the API, shared with the web frontend.
pub const NEXT_PUBLIC_API_BASE: &str = "NEXT_PUBLIC_API_BASE";

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Allowed values for `NODE_ENV`.
pub const NODE_ENV_VALUES: &[&str] = &["development", "production", "test"];
/// Default value for `NODE_ENV`.
pub const DEFAULT_NODE_ENV: &str = "development";
/// Default value for `PORT`.
pub const DEFAULT_PORT: u16 = 4000;
/// Highest port number the HTTP listener can bind.
pub(crate) const MAX_PORT: u32 = 65_535;

// ============================================================================
// SECTION: Rule Types
// ============================================================================

/// Type a raw environment string is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Verbatim, non-empty text.
    String,
    /// Finite decimal number.
    Number,
}

/// Additional constraint applied after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// No constraint beyond the value kind.
    None,
    /// Text must equal one of the listed values.
    OneOf(&'static [&'static str]),
    /// Text must be an absolute URI.
    Uri,
    /// Number must be an integer within the inclusive range.
    IntegerRange {
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },
}

/// Whether a variable must be present in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Missing values fail validation.
    Required,
    /// Missing values resolve to the default, if any, or stay absent.
    Optional,
}

/// Default applied when an optional variable is unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// Text default.
    Text(&'static str),
    /// Numeric default.
    Number(f64),
}

impl DefaultValue {
    /// Returns the kind this default coerces to.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::String,
            Self::Number(_) => ValueKind::Number,
        }
    }

    /// Converts the default into a resolved value.
    #[must_use]
    pub fn to_value(self) -> ConfigValue {
        match self {
            Self::Text(text) => ConfigValue::Text(text.to_string()),
            Self::Number(number) => ConfigValue::Number(number),
        }
    }
}

/// Validation rule for a single environment variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvRule {
    /// Variable name as it appears in the environment.
    pub name: &'static str,
    /// Target value kind.
    pub kind: ValueKind,
    /// Constraint applied after coercion.
    pub constraint: Constraint,
    /// Default used when the variable is unset.
    pub default: Option<DefaultValue>,
    /// Presence requirement.
    pub requirement: Requirement,
    /// Whether the value is a credential that must never be displayed.
    pub secret: bool,
    /// Human-readable description used by generated docs.
    pub description: &'static str,
}

impl EnvRule {
    /// Returns true when the variable must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self.requirement, Requirement::Required)
    }
}

// ============================================================================
// SECTION: Relay API Rule Table
// ============================================================================

/// Rule table for the Relay API process environment.
pub const API_ENV_RULES: &[EnvRule] = &[
    EnvRule {
        name: NODE_ENV,
        kind: ValueKind::String,
        constraint: Constraint::OneOf(NODE_ENV_VALUES),
        default: Some(DefaultValue::Text(DEFAULT_NODE_ENV)),
        requirement: Requirement::Optional,
        secret: false,
        description: "Runtime environment.",
    },
    EnvRule {
        name: PORT,
        kind: ValueKind::Number,
        constraint: Constraint::None,
        default: Some(DefaultValue::Number(4000.0)),
        requirement: Requirement::Optional,
        secret: false,
        description: "TCP port for the HTTP listener.",
    },
    EnvRule {
        name: SLACK_APP_TOKEN,
        kind: ValueKind::String,
        constraint: Constraint::None,
        default: None,
        requirement: Requirement::Required,
        secret: true,
        description: "Slack app-level token used for socket mode.",
    },
    EnvRule {
        name: SLACK_BOT_TOKEN,
        kind: ValueKind::String,
        constraint: Constraint::None,
        default: None,
        requirement: Requirement::Required,
        secret: true,
        description: "Slack bot token used for Web API calls.",
    },
    EnvRule {
        name: SLACK_SIGNING_SECRET,
        kind: ValueKind::String,
        constraint: Constraint::None,
        default: None,
        requirement: Requirement::Optional,
        secret: true,
        description: "Slack signing secret for request verification.",
    },
    EnvRule {
        name: NEXT_PUBLIC_API_BASE,
        kind: ValueKind::String,
        constraint: Constraint::Uri,
        default: None,
        requirement: Requirement::Required,
        secret: false,
        description: "Public base URL of the API as seen by the web frontend.",
    },
];

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Ordered, invariant-checked set of environment rules.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSchema {
    /// Rules in declaration order.
    rules: Vec<EnvRule>,
}

impl EnvSchema {
    /// Builds a schema after checking the rule table invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a name is empty or duplicated, a
    /// constraint does not fit its kind, or a default is inconsistent with
    /// its rule.
    pub fn new(rules: Vec<EnvRule>) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if rule.name.trim().is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(rule.name) {
                return Err(SchemaError::DuplicateName(rule.name.to_string()));
            }
            check_constraint_kind(rule)?;
            check_default(rule)?;
        }
        Ok(Self {
            rules,
        })
    }

    /// Returns the Relay API schema.
    #[must_use]
    pub fn api() -> Self {
        Self {
            rules: API_ENV_RULES.to_vec(),
        }
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[EnvRule] {
        &self.rules
    }

    /// Looks up a rule by variable name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&EnvRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Returns variable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    /// Returns the names of rules flagged as secret.
    #[must_use]
    pub fn secret_names(&self) -> BTreeSet<&'static str> {
        self.rules.iter().filter(|rule| rule.secret).map(|rule| rule.name).collect()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the schema declares no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for EnvSchema {
    fn default() -> Self {
        Self::api()
    }
}

// ============================================================================
// SECTION: Invariant Checks
// ============================================================================

/// Rejects constraints that cannot apply to the rule's kind.
fn check_constraint_kind(rule: &EnvRule) -> Result<(), SchemaError> {
    let fits = match rule.constraint {
        Constraint::None => true,
        Constraint::OneOf(values) => rule.kind == ValueKind::String && !values.is_empty(),
        Constraint::Uri => rule.kind == ValueKind::String,
        Constraint::IntegerRange {
            min,
            max,
        } => rule.kind == ValueKind::Number && min <= max,
    };
    if fits {
        Ok(())
    } else {
        Err(SchemaError::ConstraintMismatch(rule.name.to_string()))
    }
}

/// Rejects defaults on required rules and defaults that fail their own rule.
fn check_default(rule: &EnvRule) -> Result<(), SchemaError> {
    let Some(default) = rule.default else {
        return Ok(());
    };
    if rule.is_required() {
        return Err(SchemaError::RequiredWithDefault(rule.name.to_string()));
    }
    if default.kind() != rule.kind {
        return Err(SchemaError::InvalidDefault {
            name: rule.name.to_string(),
            reason: "default kind does not match rule kind".to_string(),
        });
    }
    let value = default.to_value();
    if let ConfigValue::Text(text) = &value
        && text.is_empty()
    {
        return Err(SchemaError::InvalidDefault {
            name: rule.name.to_string(),
            reason: ViolationKind::Empty.to_string(),
        });
    }
    check_constraint(rule, &value).map_err(|kind| SchemaError::InvalidDefault {
        name: rule.name.to_string(),
        reason: kind.to_string(),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]
mod tests {
    use super::*;

    #[test]
    fn api_rule_table_passes_invariant_checks() {
        assert!(EnvSchema::new(API_ENV_RULES.to_vec()).is_ok());
    }

    #[test]
    fn port_default_matches_constant() {
        let schema = EnvSchema::api();
        let rule = schema.rule(PORT).map(|rule| rule.default);
        assert_eq!(rule, Some(Some(DefaultValue::Number(f64::from(DEFAULT_PORT)))));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let rules = vec![API_ENV_RULES[0], API_ENV_RULES[0]];
        assert_eq!(EnvSchema::new(rules), Err(SchemaError::DuplicateName(NODE_ENV.to_string())));
    }

    #[test]
    fn default_outside_allowed_set_is_rejected() {
        let mut rule = API_ENV_RULES[0];
        rule.default = Some(DefaultValue::Text("staging"));
        assert!(matches!(
            EnvSchema::new(vec![rule]),
            Err(SchemaError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn required_rule_with_default_is_rejected() {
        let mut rule = API_ENV_RULES[2];
        rule.default = Some(DefaultValue::Text("xapp"));
        assert_eq!(
            EnvSchema::new(vec![rule]),
            Err(SchemaError::RequiredWithDefault(SLACK_APP_TOKEN.to_string()))
        );
    }

    #[test]
    fn uri_constraint_on_number_is_rejected() {
        let mut rule = API_ENV_RULES[1];
        rule.constraint = Constraint::Uri;
        assert_eq!(
            EnvSchema::new(vec![rule]),
            Err(SchemaError::ConstraintMismatch(PORT.to_string()))
        );
    }

    #[test]
    fn secret_names_cover_slack_credentials() {
        let secrets = EnvSchema::api().secret_names();
        let expected: BTreeSet<&str> =
            [SLACK_APP_TOKEN, SLACK_BOT_TOKEN, SLACK_SIGNING_SECRET].into_iter().collect();
        assert_eq!(secrets, expected);
    }
}
