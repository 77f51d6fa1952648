// crates/relay-cli/src/lib.rs
// ============================================================================
// Module: Relay CLI Library
// Description: Shared helpers for the Relay API command-line interface.
// Purpose: Provide reusable components (i18n, logging) for the binary and tests.
// Dependencies: tracing, tracing-subscriber, thiserror
// ============================================================================

//! ## Overview
//! This library houses shared CLI utilities: the message catalog behind the
//! [`t!`] macro and the logging setup. The binary entry point (`src/main.rs`)
//! imports these helpers so that all user-facing output stays consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Structured logging setup.
pub mod logging;

#[cfg(test)]
mod tests;
