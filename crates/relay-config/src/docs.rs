// crates/relay-config/src/docs.rs
// ============================================================================
// Module: Environment Docs Generator
// Description: Markdown generator for the Relay API environment reference.
// Purpose: Keep environment docs in sync with the rule table and schema.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Generates `Docs/configuration/environment.md` from the canonical
//! environment schema. The output is deterministic so CI can detect drift.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::rules::EnvSchema;
use crate::schema::env_schema_for;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default output path for generated environment docs.
pub const DOCS_PATH: &str = "Docs/configuration/environment.md";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when generating or verifying environment docs.
#[derive(Debug, Error)]
pub enum DocsError {
    /// IO failure while reading or writing docs.
    #[error("docs io error: {0}")]
    Io(String),
    /// Schema traversal or rendering error.
    #[error("docs schema error: {0}")]
    Schema(String),
    /// Generated docs do not match the committed file.
    #[error("docs drift: {0}")]
    Drift(String),
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Generates the environment markdown documentation.
///
/// # Errors
///
/// Returns [`DocsError`] when schema traversal fails.
pub fn env_docs_markdown() -> Result<String, DocsError> {
    let rules = EnvSchema::api();
    let schema = env_schema_for(&rules);
    let mut out = String::new();

    out.push_str("<!--\n");
    out.push_str("Docs/configuration/environment.md\n");
    out.push_str("============================================================================\n");
    out.push_str("Document: Relay API Environment\n");
    out.push_str("Description: Reference for environment variables read at startup.\n");
    out.push_str("Purpose: Document required secrets, defaults, and accepted values.\n");
    out.push_str("Generated: This file is auto-generated; do not edit manually.\n");
    out.push_str("============================================================================\n");
    out.push_str("-->\n\n");

    out.push_str("# Relay API Environment\n\n");
    out.push_str("## Overview\n\n");
    out.push_str("The Relay API validates its environment once at startup. Every violation is\n");
    out.push_str("reported together and the process exits before any listener or Slack client\n");
    out.push_str("starts. Variables not listed here are ignored.\n\n");

    out.push_str("## Variables\n\n");
    let names = rules.names().collect::<Vec<&str>>();
    let table = render_table(&schema, &names).map_err(DocsError::Schema)?;
    out.push_str(&table);
    out.push('\n');

    out.push_str("## Loading Order\n\n");
    out.push_str("- Process environment variables always win.\n");
    out.push_str("- Unset variables are filled from `.env` in the working directory, unless\n");
    out.push_str("  `--no-env-file` is given or another file is chosen with `--env-file`.\n");
    out.push_str("- Defaults apply last.\n");

    Ok(out)
}

/// Writes the generated docs to `path` or the standard location.
///
/// # Errors
///
/// Returns [`DocsError`] when file output fails.
pub fn write_env_docs(path: Option<&Path>) -> Result<(), DocsError> {
    let path = path.unwrap_or_else(|| Path::new(DOCS_PATH));
    let content = env_docs_markdown()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| DocsError::Io(err.to_string()))?;
    }
    fs::write(path, content.as_bytes()).map_err(|err| DocsError::Io(err.to_string()))
}

/// Verifies the on-disk docs match the generated output.
///
/// # Errors
///
/// Returns [`DocsError`] when the docs drift or cannot be read.
pub fn verify_env_docs(path: Option<&Path>) -> Result<(), DocsError> {
    let path = path.unwrap_or_else(|| Path::new(DOCS_PATH));
    let content = env_docs_markdown()?;
    let existing = fs::read_to_string(path).map_err(|err| DocsError::Io(err.to_string()))?;
    if existing != content {
        return Err(DocsError::Drift(format!("docs mismatch: {}", path.display())));
    }
    Ok(())
}

// ============================================================================
// SECTION: Rendering Helpers
// ============================================================================

/// Renders the markdown table for all variables, in rule order.
fn render_table(schema: &Value, names: &[&str]) -> Result<String, String> {
    let props = schema
        .get("properties")
        .and_then(|value| value.as_object())
        .ok_or_else(|| "schema properties missing".to_string())?;

    let mut seen = BTreeSet::new();
    for name in names {
        if !props.contains_key(*name) {
            return Err(format!("missing variable in schema: {name}"));
        }
        seen.insert(*name);
    }
    for key in props.keys() {
        if !seen.contains(key.as_str()) {
            return Err(format!("variable not documented: {key}"));
        }
    }

    let required = schema
        .get("required")
        .and_then(|value| value.as_array())
        .map(|arr| arr.iter().filter_map(|val| val.as_str()).collect::<Vec<&str>>())
        .unwrap_or_default();

    let mut table = String::new();
    table.push_str("| Variable | Type | Required | Default | Notes |\n");
    table.push_str("| --- | --- | --- | --- | --- |\n");
    for name in names {
        let prop = props.get(*name).ok_or_else(|| format!("missing variable schema: {name}"))?;
        let var_type = escape_table_cell(&format_schema_type(prop));
        let required_value = if required.contains(name) { "yes" } else { "no" };
        let default_value = prop.get("default").map_or_else(|| "n/a".to_string(), format_default_value);
        let mut notes = prop
            .get("description")
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string();
        if prop.get("writeOnly").and_then(Value::as_bool) == Some(true) {
            notes.push_str(" Secret; never logged.");
        }
        let _ = writeln!(
            &mut table,
            "| `{name}` | {var_type} | {required_value} | {default_value} | {notes} |"
        );
    }
    Ok(table)
}

/// Formats a schema type for markdown tables.
fn format_schema_type(schema: &Value) -> String {
    if let Some(enum_vals) = schema.get("enum").and_then(|val| val.as_array()) {
        let items = enum_vals.iter().map(format_enum_value).collect::<Vec<String>>();
        return items.join(" | ");
    }
    let base = match schema.get("type").and_then(|val| val.as_str()) {
        Some("string") => "string".to_string(),
        Some("integer") => "integer".to_string(),
        Some("number") => "number".to_string(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    };
    let format = schema.get("format").and_then(|val| val.as_str());
    let range = schema
        .get("minimum")
        .zip(schema.get("maximum"))
        .map(|(min, max)| format!(" ({min}..={max})"));
    match (format, range) {
        (Some(format), _) => format!("{base} ({format})"),
        (None, Some(range)) => format!("{base}{range}"),
        (None, None) => base,
    }
}

/// Escapes pipe characters for markdown table cells.
fn escape_table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Formats enum values as quoted strings.
fn format_enum_value(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), |text| format!("\"{text}\""))
}

/// Formats schema defaults for display in docs.
fn format_default_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(val) => format!("`{val}`"),
        other => format!("`{other}`"),
    }
}
