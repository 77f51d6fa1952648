//! Property tests for unrelated environment variables in relay-config.
// crates/relay-config/tests/unrelated_variables.rs
// =============================================================================
// Module: Unrelated Variable Property Tests
// Description: Undeclared variables never change the validation outcome.
// Purpose: Guard the "ignore unknown variables" contract.
// =============================================================================

use proptest::prelude::*;
use relay_config::EnvSchema;
use relay_config::RawValue;
use relay_config::validate;

mod common;

proptest! {
    #[test]
    fn undeclared_variables_do_not_change_outcome(
        extra in proptest::collection::btree_map("X_[A-Z0-9_]{1,12}", ".{0,24}", 0..8),
        drop_index in 0usize..7,
    ) {
        let schema = EnvSchema::api();
        let mut baseline = common::valid_snapshot();
        if let Some((name, _)) = common::VALID_PAIRS.get(drop_index) {
            baseline = common::snapshot_without(name);
        }
        let expected = validate(&schema, &baseline);

        let mut noisy = baseline.clone();
        for (name, value) in extra {
            noisy.insert(name, RawValue::Text(value));
        }
        let actual = validate(&schema, &noisy);
        prop_assert_eq!(actual, expected);
    }
}
