// crates/relay-config/src/validate.rs
// ============================================================================
// Module: Environment Validator
// Description: Generic interpreter for environment rule tables.
// Purpose: Turn a raw snapshot into a resolved config or a full violation list.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`validate`] walks the schema in declaration order, applies defaults,
//! coerces raw strings to their declared kinds, and checks constraints. It
//! collects every violation instead of stopping at the first one. Variables
//! the schema does not declare are ignored.
//!
//! ## Coercion
//! - Strings are taken verbatim and must be non-empty.
//! - Numbers are trimmed and parsed as finite decimals.
//! - URIs must parse as absolute URIs with a scheme and contain no
//!   whitespace or control characters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use url::Url;

use crate::error::ConfigValidationError;
use crate::error::Violation;
use crate::error::ViolationKind;
use crate::resolved::ConfigValue;
use crate::resolved::ResolvedConfig;
use crate::rules::Constraint;
use crate::rules::EnvRule;
use crate::rules::EnvSchema;
use crate::rules::ValueKind;
use crate::snapshot::EnvSnapshot;
use crate::snapshot::RawValue;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Validates `snapshot` against `schema`.
///
/// # Errors
///
/// Returns [`ConfigValidationError`] listing every violated rule, in schema
/// order, when any rule fails.
pub fn validate(
    schema: &EnvSchema,
    snapshot: &EnvSnapshot,
) -> Result<ResolvedConfig, ConfigValidationError> {
    let mut values = BTreeMap::new();
    let mut violations = Vec::new();
    for rule in schema.rules() {
        match resolve_rule(rule, snapshot.get(rule.name)) {
            Ok(Some(value)) => {
                values.insert(rule.name, value);
            }
            Ok(None) => {}
            Err(kind) => violations.push(Violation::for_rule(rule, kind)),
        }
    }
    if !violations.is_empty() {
        return Err(ConfigValidationError::new(violations));
    }
    Ok(ResolvedConfig::new(values, schema.secret_names()))
}

impl EnvSchema {
    /// Validates `snapshot` against this schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] when any rule fails.
    pub fn validate(&self, snapshot: &EnvSnapshot) -> Result<ResolvedConfig, ConfigValidationError> {
        validate(self, snapshot)
    }
}

// ============================================================================
// SECTION: Rule Resolution
// ============================================================================

/// Resolves one rule; `Ok(None)` means an optional variable without default.
fn resolve_rule(
    rule: &EnvRule,
    raw: Option<&RawValue>,
) -> Result<Option<ConfigValue>, ViolationKind> {
    let text = match raw {
        None => {
            return match rule.default {
                Some(default) => Ok(Some(default.to_value())),
                None if rule.is_required() => Err(ViolationKind::Missing),
                None => Ok(None),
            };
        }
        Some(RawValue::NotUnicode) => return Err(ViolationKind::NotUnicode),
        Some(RawValue::Text(text)) => text,
    };
    let value = coerce(rule.kind, text)?;
    check_constraint(rule, &value)?;
    Ok(Some(value))
}

/// Coerces a raw string into the requested kind.
fn coerce(kind: ValueKind, raw: &str) -> Result<ConfigValue, ViolationKind> {
    match kind {
        ValueKind::String => {
            if raw.is_empty() {
                return Err(ViolationKind::Empty);
            }
            Ok(ConfigValue::Text(raw.to_string()))
        }
        ValueKind::Number => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ViolationKind::Empty);
            }
            match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(ConfigValue::Number(number)),
                _ => Err(ViolationKind::NotANumber {
                    value: raw.to_string(),
                }),
            }
        }
    }
}

/// Checks the rule constraint against an already-coerced value.
///
/// Constraint/kind pairs that do not fit are rejected when the schema is
/// built, so they pass here.
pub(crate) fn check_constraint(rule: &EnvRule, value: &ConfigValue) -> Result<(), ViolationKind> {
    match (rule.constraint, value) {
        (Constraint::OneOf(allowed), ConfigValue::Text(text)) => {
            if allowed.contains(&text.as_str()) {
                Ok(())
            } else {
                Err(ViolationKind::NotAllowed {
                    value: text.clone(),
                    allowed: allowed.join(", "),
                })
            }
        }
        (Constraint::Uri, ConfigValue::Text(text)) => {
            // The URL parser strips and skips these silently.
            if text.chars().any(|ch| ch.is_ascii_whitespace() || ch.is_control()) {
                return Err(ViolationKind::MalformedUri {
                    value: text.clone(),
                    reason: "contains whitespace or control characters".to_string(),
                });
            }
            Url::parse(text).map(|_| ()).map_err(|err| ViolationKind::MalformedUri {
                value: text.clone(),
                reason: err.to_string(),
            })
        }
        (
            Constraint::IntegerRange {
                min,
                max,
            },
            ConfigValue::Number(number),
        ) => {
            let in_range = number.fract() == 0.0
                && *number >= f64::from(min)
                && *number <= f64::from(max);
            if in_range {
                Ok(())
            } else {
                Err(ViolationKind::OutOfRange {
                    value: value.to_string(),
                    min,
                    max,
                })
            }
        }
        _ => Ok(()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only panic-based assertions are permitted."
)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed_and_accept_exponents() {
        assert_eq!(coerce(ValueKind::Number, " 8080 "), Ok(ConfigValue::Number(8080.0)));
        assert_eq!(coerce(ValueKind::Number, "8e3"), Ok(ConfigValue::Number(8000.0)));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for raw in ["inf", "NaN", "-infinity"] {
            assert_eq!(
                coerce(ValueKind::Number, raw),
                Err(ViolationKind::NotANumber {
                    value: raw.to_string()
                })
            );
        }
    }

    #[test]
    fn blank_number_is_empty() {
        assert_eq!(coerce(ValueKind::Number, "   "), Err(ViolationKind::Empty));
    }

    #[test]
    fn strings_are_not_trimmed() {
        assert_eq!(
            coerce(ValueKind::String, " padded "),
            Ok(ConfigValue::Text(" padded ".to_string()))
        );
    }

    #[test]
    fn integer_range_rejects_fractions_and_bounds() {
        let mut rule = EnvSchema::api().rule(crate::rules::PORT).copied().expect("port rule");
        rule.constraint = Constraint::IntegerRange {
            min: 0,
            max: 65_535,
        };
        assert!(matches!(
            check_constraint(&rule, &ConfigValue::Number(80.5)),
            Err(ViolationKind::OutOfRange { .. })
        ));
        assert!(check_constraint(&rule, &ConfigValue::Number(65_535.0)).is_ok());
        assert!(check_constraint(&rule, &ConfigValue::Number(65_536.0)).is_err());
    }

    #[test]
    fn relative_reference_is_not_a_uri() {
        let schema = EnvSchema::api();
        let rule = schema.rule(crate::rules::NEXT_PUBLIC_API_BASE).copied().expect("uri rule");
        assert!(check_constraint(&rule, &ConfigValue::Text("/api".to_string())).is_err());
        assert!(
            check_constraint(&rule, &ConfigValue::Text("https://api.example.com".to_string()))
                .is_ok()
        );
    }
}
