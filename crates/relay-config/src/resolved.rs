// crates/relay-config/src/resolved.rs
// ============================================================================
// Module: Resolved Configuration
// Description: Immutable, typed view of a validated environment.
// Purpose: Hold validated values for the lifetime of the process.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ResolvedConfig`] is produced once by [`crate::validate`] and is never
//! mutated afterwards. It only contains variables declared by the schema;
//! unrelated environment entries never reach it. Secret values are masked in
//! `Debug` output and in [`ResolvedConfig::redacted`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::REDACTED;
use crate::rules::ValueKind;

// ============================================================================
// SECTION: Values
// ============================================================================

/// A validated, coerced environment value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
}

impl ConfigValue {
    /// Returns the value kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::String,
            Self::Number(_) => ValueKind::Number,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    /// Returns the number, if this is a numeric value.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(_) => None,
        }
    }

    /// Converts the value into JSON.
    fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => number_to_json(*number),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Renders integral numbers as JSON integers so `4000` never prints as `4000.0`.
fn number_to_json(number: f64) -> Value {
    let rendered = number.to_string();
    rendered.parse::<i64>().map_or_else(
        |_| serde_json::Number::from_f64(number).map_or(Value::Null, Value::Number),
        |integer| Value::Number(integer.into()),
    )
}

// ============================================================================
// SECTION: Resolved Config
// ============================================================================

/// Immutable mapping from declared variable name to validated value.
#[derive(Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Validated values keyed by variable name.
    values: BTreeMap<&'static str, ConfigValue>,
    /// Names whose values must never be displayed.
    secrets: BTreeSet<&'static str>,
}

impl ResolvedConfig {
    /// Builds a resolved config; only the validator creates these.
    pub(crate) const fn new(
        values: BTreeMap<&'static str, ConfigValue>,
        secrets: BTreeSet<&'static str>,
    ) -> Self {
        Self {
            values,
            secrets,
        }
    }

    /// Returns the value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    /// Returns the text value for `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ConfigValue::as_str)
    }

    /// Returns the numeric value for `name`.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ConfigValue::as_number)
    }

    /// Returns true when `name` resolved to a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns true when `name` is a secret variable.
    #[must_use]
    pub fn is_secret(&self, name: &str) -> bool {
        self.secrets.contains(name)
    }

    /// Returns resolved variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Returns the number of resolved variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a JSON object of all values with secrets masked.
    #[must_use]
    pub fn redacted(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.values {
            let rendered = if self.is_secret(name) {
                Value::String(REDACTED.to_string())
            } else {
                value.to_json()
            };
            map.insert((*name).to_string(), rendered);
        }
        Value::Object(map)
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.values {
            if self.is_secret(name) {
                map.entry(name, &REDACTED);
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
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
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> ResolvedConfig {
        let mut values = BTreeMap::new();
        values.insert("PORT", ConfigValue::Number(4000.0));
        values.insert("TOKEN", ConfigValue::Text("xoxb-live".to_string()));
        values.insert("NAME", ConfigValue::Text("relay".to_string()));
        ResolvedConfig::new(values, ["TOKEN"].into_iter().collect())
    }

    #[test]
    fn redacted_masks_secrets_and_keeps_integers() {
        assert_eq!(
            sample().redacted(),
            json!({ "NAME": "relay", "PORT": 4000, "TOKEN": "***" })
        );
    }

    #[test]
    fn debug_output_never_contains_secret() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("xoxb-live"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn fractional_numbers_stay_fractional_in_json() {
        assert_eq!(number_to_json(0.5), json!(0.5));
    }
}
