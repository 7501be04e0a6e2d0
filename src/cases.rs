//! Preset example wines used to populate the form.

use crate::features::FeatureRecord;

/// A preset feature record, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExampleCase {
    /// 1-based number shown to the user.
    pub number: usize,
    /// The preset values.
    pub record: FeatureRecord,
}

/// Number of shipped example cases.
pub const CASE_COUNT: usize = 6;

/// The shipped example cases, in cycling order.
pub static EXAMPLE_CASES: [ExampleCase; CASE_COUNT] = [
    ExampleCase {
        number: 1,
        record: FeatureRecord::new([
            7.30, 0.65, 0.00, 1.20, 0.065, 15.0, 21.0, 0.9946, 3.39, 0.47, 10.0,
        ]),
    },
    ExampleCase {
        number: 2,
        record: FeatureRecord::new([
            9.5, 0.88, 0.00, 2.3, 0.09, 5.0, 15.0, 0.997, 3.65, 0.45, 9.4,
        ]),
    },
    ExampleCase {
        number: 3,
        record: FeatureRecord::new([
            7.8, 0.58, 0.02, 2.0, 0.073, 9.0, 18.0, 0.9968, 3.36, 0.57, 9.5,
        ]),
    },
    ExampleCase {
        number: 4,
        record: FeatureRecord::new([
            7.7, 0.69, 0.22, 1.9, 0.084, 18.0, 94.0, 0.9961, 3.31, 0.48, 9.5,
        ]),
    },
    ExampleCase {
        number: 5,
        record: FeatureRecord::new([
            8.8, 0.61, 0.30, 2.8, 0.088, 17.0, 46.0, 0.9976, 3.26, 0.51, 9.3,
        ]),
    },
    ExampleCase {
        number: 6,
        record: FeatureRecord::new([
            8.5, 0.28, 0.56, 1.8, 0.092, 35.0, 103.0, 0.9969, 3.30, 0.75, 10.5,
        ]),
    },
];

/// Case at a position, wrapped into range.
#[must_use]
pub fn case_at(index: usize) -> &'static ExampleCase {
    &EXAMPLE_CASES[index % CASE_COUNT]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    #[test]
    fn test_case_numbers_are_sequential() {
        for (i, case) in EXAMPLE_CASES.iter().enumerate() {
            assert_eq!(case.number, i + 1);
        }
    }

    #[test]
    fn test_first_case_values() {
        let record = EXAMPLE_CASES[0].record;
        assert_eq!(record.get(Feature::FixedAcidity), 7.30);
        assert_eq!(record.get(Feature::Chlorides), 0.065);
        assert_eq!(record.get(Feature::Density), 0.9946);
        assert_eq!(record.get(Feature::Alcohol), 10.0);
    }

    #[test]
    fn test_all_presets_non_negative() {
        for case in &EXAMPLE_CASES {
            assert!(case.record.values().iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_case_at_wraps() {
        assert_eq!(case_at(6).number, 1);
        assert_eq!(case_at(13).number, 2);
    }
}
