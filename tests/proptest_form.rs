//! Property-based tests for the input form and feature records.

#![allow(clippy::disallowed_methods)]

use proptest::prelude::*;
use wine_quality::cases::EXAMPLE_CASES;
use wine_quality::error::WineError;
use wine_quality::features::{Feature, FeatureRecord, FEATURE_COUNT};
use wine_quality::form::InputForm;

/// Strategy for picking one of the shipped cases
fn case_index() -> impl Strategy<Value = usize> {
    0..EXAMPLE_CASES.len()
}

/// Strategy for picking a feature
fn feature() -> impl Strategy<Value = Feature> {
    (0..FEATURE_COUNT).prop_map(|i| Feature::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: any non-negative finite value is accepted and collected as-is
    #[test]
    fn non_negative_values_accepted(
        case in case_index(),
        feature in feature(),
        value in 0.0f64..1.0e6,
    ) {
        let mut form = InputForm::from_case(&EXAMPLE_CASES[case]);
        form.set(feature, value).unwrap();

        let record = form.collect();
        prop_assert_eq!(record.get(feature), value);
        for other in Feature::ALL.iter().filter(|f| **f != feature) {
            prop_assert_eq!(record.get(*other), EXAMPLE_CASES[case].record.get(*other));
        }
    }

    /// Property: any negative value is rejected and leaves the form unchanged
    #[test]
    fn negative_values_rejected(
        case in case_index(),
        feature in feature(),
        value in -1.0e6f64..-1.0e-9,
    ) {
        let mut form = InputForm::from_case(&EXAMPLE_CASES[case]);
        let before = form.collect();

        let err = form.set(feature, value).unwrap_err();
        prop_assert!(matches!(err, WineError::NegativeValue { .. }), "unexpected error: {err}");
        prop_assert_eq!(form.collect(), before);
    }

    /// Property: only slices of exactly eleven values make a record
    #[test]
    fn record_requires_eleven_values(values in prop::collection::vec(0.0f64..100.0, 0..30)) {
        let result = FeatureRecord::from_slice(&values);
        if values.len() == FEATURE_COUNT {
            let record = result.unwrap();
            prop_assert_eq!(record.values().as_slice(), values.as_slice());
        } else {
            let is_shape_mismatch = matches!(result, Err(WineError::ShapeMismatch { .. }));
            prop_assert!(is_shape_mismatch);
        }
    }

    /// Property: labeled pairs in any order build the same record
    #[test]
    fn pairs_order_does_not_matter(
        values in prop::collection::vec(0.0f64..100.0, FEATURE_COUNT),
        rotation in 0..FEATURE_COUNT,
    ) {
        let mut pairs: Vec<(&str, f64)> = Feature::ALL
            .iter()
            .zip(&values)
            .map(|(f, v)| (f.label(), *v))
            .collect();
        pairs.rotate_left(rotation);

        let record = FeatureRecord::from_pairs(pairs).unwrap();
        prop_assert_eq!(record.values().as_slice(), values.as_slice());
    }
}

#[cfg(test)]
mod edge_cases {
    use super::*;

    #[test]
    fn every_case_roundtrips_through_defaults() {
        for case in &EXAMPLE_CASES {
            assert_eq!(InputForm::from_case(case).collect(), case.record);
        }
    }

    #[test]
    fn zero_accepted_for_every_feature() {
        let mut form = InputForm::from_case(&EXAMPLE_CASES[0]);
        for feature in Feature::ALL {
            form.set(feature, 0.0).unwrap();
        }
        assert!(form.collect().values().iter().all(|&v| v == 0.0));
    }
}
