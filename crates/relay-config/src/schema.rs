// crates/relay-config/src/schema.rs
// ============================================================================
// Module: Environment JSON Schema
// Description: JSON schema builder for the resolved environment.
// Purpose: Provide a canonical, tool-readable form of the rule table.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Renders an [`EnvSchema`] as a JSON Schema (draft 2020-12) describing the
//! *resolved* configuration: numbers are numbers, defaults are typed, and
//! secret variables are marked `writeOnly`. The schema drives the generated
//! docs and can validate [`crate::ResolvedConfig::redacted`] output.

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::rules::Constraint;
use crate::rules::DefaultValue;
use crate::rules::EnvRule;
use crate::rules::EnvSchema;
use crate::rules::ValueKind;

/// Returns the JSON schema for the Relay API environment.
#[must_use]
pub fn env_schema() -> Value {
    env_schema_for(&EnvSchema::api())
}

/// Returns the JSON schema for an arbitrary rule table.
#[must_use]
pub fn env_schema_for(schema: &EnvSchema) -> Value {
    let mut properties = Map::new();
    for rule in schema.rules() {
        properties.insert(rule.name.to_string(), rule_schema(rule));
    }
    let required = schema
        .rules()
        .iter()
        .filter(|rule| rule.is_required())
        .map(|rule| Value::String(rule.name.to_string()))
        .collect::<Vec<Value>>();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "relay-api://contract/schemas/environment.schema.json",
        "title": "Relay API Environment",
        "description": "Process environment accepted by the Relay API at startup.",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: Rule Schemas
// ============================================================================

/// Schema for a single variable.
fn rule_schema(rule: &EnvRule) -> Value {
    let mut schema = Map::new();
    match (rule.kind, rule.constraint) {
        (
            ValueKind::Number,
            Constraint::IntegerRange {
                min,
                max,
            },
        ) => {
            schema.insert("type".to_string(), json!("integer"));
            schema.insert("minimum".to_string(), json!(min));
            schema.insert("maximum".to_string(), json!(max));
        }
        (ValueKind::Number, _) => {
            schema.insert("type".to_string(), json!("number"));
        }
        (ValueKind::String, Constraint::OneOf(values)) => {
            schema.insert("type".to_string(), json!("string"));
            schema.insert("enum".to_string(), json!(values));
        }
        (ValueKind::String, Constraint::Uri) => {
            schema.insert("type".to_string(), json!("string"));
            schema.insert("format".to_string(), json!("uri"));
            schema.insert("minLength".to_string(), json!(1));
        }
        (ValueKind::String, _) => {
            schema.insert("type".to_string(), json!("string"));
            schema.insert("minLength".to_string(), json!(1));
        }
    }
    if let Some(default) = rule.default {
        schema.insert("default".to_string(), default_json(default));
    }
    if rule.secret {
        schema.insert("writeOnly".to_string(), json!(true));
    }
    schema.insert("description".to_string(), json!(rule.description));
    Value::Object(schema)
}

/// Renders a default as typed JSON.
fn default_json(default: DefaultValue) -> Value {
    match default {
        DefaultValue::Text(text) => json!(text),
        DefaultValue::Number(number) => {
            let rendered = number.to_string();
            rendered.parse::<i64>().map_or_else(|_| json!(number), |integer| json!(integer))
        }
    }
}
