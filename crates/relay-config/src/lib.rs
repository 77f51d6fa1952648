// crates/relay-config/src/lib.rs
// ============================================================================
// Module: Relay Config Library
// Description: Environment contract, validation, and artifact generation.
// Purpose: Single source of truth for the Relay API process environment.
// Dependencies: dotenvy, serde, serde_json, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! `relay-config` defines the environment contract for the Relay API. A
//! declarative rule table ([`EnvSchema`]) is interpreted by a generic
//! validator that turns a raw [`EnvSnapshot`] into an immutable
//! [`ResolvedConfig`], or reports every violated rule at once.
//!
//! The [`startup`] module runs that validation exactly once at boot and hands
//! the result to the caller, which passes it explicitly to every component
//! that needs it. Deterministic generators for the JSON schema, docs, and a
//! `.env.example` keep the contract auditable.
//!
//! Security posture: environment inputs are untrusted and secrets must never
//! be echoed back; validation fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api_env;
pub mod docs;
pub mod error;
pub mod examples;
pub mod resolved;
pub mod rules;
pub mod schema;
pub mod snapshot;
pub mod startup;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api_env::ApiEnv;
pub use api_env::HttpSettings;
pub use api_env::NodeEnv;
pub use api_env::Secret;
pub use api_env::SlackCredentials;
pub use docs::DocsError;
pub use docs::env_docs_markdown;
pub use docs::verify_env_docs;
pub use docs::write_env_docs;
pub use error::ConfigValidationError;
pub use error::SchemaError;
pub use error::Violation;
pub use error::ViolationKind;
pub use examples::env_example;
pub use resolved::ConfigValue;
pub use resolved::ResolvedConfig;
pub use rules::*;
pub use schema::env_schema;
pub use schema::env_schema_for;
pub use snapshot::EnvSnapshot;
pub use snapshot::RawValue;
pub use snapshot::SnapshotError;
pub use startup::Bootstrap;
pub use startup::EnvFile;
pub use startup::StartupError;
pub use startup::StartupLoader;
pub use startup::boot;
pub use startup::boot_from;
pub use validate::validate;
