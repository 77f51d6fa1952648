// crates/relay-config/tests/common/mod.rs
// =============================================================================
// Module: Environment Test Helpers
// Description: Shared snapshots for environment validation tests.
// Purpose: Reduce duplication across integration tests for relay-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use relay_config::EnvSnapshot;

/// Fully valid Relay API environment, including the optional signing secret.
pub const VALID_PAIRS: &[(&str, &str)] = &[
    ("NODE_ENV", "production"),
    ("PORT", "8080"),
    ("SLACK_APP_TOKEN", "xapp-1-test"),
    ("SLACK_BOT_TOKEN", "xoxb-test"),
    ("SLACK_SIGNING_SECRET", "signing-test"),
    ("NEXT_PUBLIC_API_BASE", "https://api.example.com/v1"),
];

/// Required variables only.
pub const REQUIRED_PAIRS: &[(&str, &str)] = &[
    ("SLACK_APP_TOKEN", "xapp-1-test"),
    ("SLACK_BOT_TOKEN", "xoxb-test"),
    ("NEXT_PUBLIC_API_BASE", "http://localhost:4000"),
];

/// Returns a snapshot with every declared variable set to a valid value.
pub fn valid_snapshot() -> EnvSnapshot {
    EnvSnapshot::from_pairs(VALID_PAIRS.iter().copied())
}

/// Returns a snapshot with only the required variables set.
pub fn required_snapshot() -> EnvSnapshot {
    EnvSnapshot::from_pairs(REQUIRED_PAIRS.iter().copied())
}

/// Returns the valid snapshot with `name` removed.
pub fn snapshot_without(name: &str) -> EnvSnapshot {
    EnvSnapshot::from_pairs(VALID_PAIRS.iter().copied().filter(|(key, _)| *key != name))
}

/// Returns the valid snapshot with `name` set to `value`.
pub fn snapshot_with(name: &str, value: &str) -> EnvSnapshot {
    EnvSnapshot::from_pairs(
        VALID_PAIRS
            .iter()
            .copied()
            .map(|(key, current)| if key == name { (key, value) } else { (key, current) }),
    )
}
