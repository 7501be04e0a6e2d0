//! Editable input form: one non-negative numeric field per feature.
//!
//! Values are only checked for being finite and `>= 0.0`. Chemically
//! implausible values (pH above 14, density of 40) pass through unchanged.

use crate::cases::ExampleCase;
use crate::error::{Result, WineError};
use crate::features::{Feature, FeatureRecord, FEATURE_COUNT};

/// Smallest value any field accepts.
pub const MIN_VALUE: f64 = 0.0;

/// Decimal places used when displaying a field.
pub const DISPLAY_PRECISION: usize = 4;

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormField {
    pub feature: Feature,
    pub value: f64,
}

impl FormField {
    /// Value formatted for display, e.g. `0.0650`.
    #[must_use]
    pub fn display_value(&self) -> String {
        format!("{:.prec$}", self.value, prec = DISPLAY_PRECISION)
    }

    /// Field label with the trailing colon used on the form.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{}:", self.feature.label())
    }
}

/// The eleven fields of the form, seeded from an example case.
#[derive(Debug, Clone, PartialEq)]
pub struct InputForm {
    fields: [FormField; FEATURE_COUNT],
}

impl InputForm {
    /// Build a form whose fields default to the case's values.
    #[must_use]
    pub fn from_case(case: &ExampleCase) -> Self {
        Self::from_record(&case.record)
    }

    /// Build a form whose fields default to a record's values.
    #[must_use]
    pub fn from_record(record: &FeatureRecord) -> Self {
        let fields = Feature::ALL.map(|feature| FormField {
            feature,
            value: record.get(feature),
        });
        Self { fields }
    }

    /// Build a form from raw values in model input order, applying the same
    /// checks as [`InputForm::set`] to each one.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` unless exactly eleven values are given, plus
    /// the first error from [`InputForm::set`].
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let record = FeatureRecord::from_slice(values)?;
        let mut form = Self::from_record(&FeatureRecord::new([MIN_VALUE; FEATURE_COUNT]));
        for (feature, value) in record.iter() {
            form.set(feature, value)?;
        }
        Ok(form)
    }

    /// Fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Edit one field.
    ///
    /// # Errors
    ///
    /// Returns `NotNumeric` for NaN or infinite values and `NegativeValue`
    /// for values below [`MIN_VALUE`].
    pub fn set(&mut self, feature: Feature, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(WineError::not_numeric(feature.label(), value.to_string()));
        }
        if value < MIN_VALUE {
            return Err(WineError::NegativeValue {
                feature: feature.label().to_string(),
                value,
            });
        }
        self.fields[feature.index()].value = value;
        Ok(())
    }

    /// Edit one field from submitted text.
    ///
    /// # Errors
    ///
    /// Returns `NotNumeric` if the text does not parse as a number, plus
    /// any error from [`InputForm::set`].
    pub fn set_text(&mut self, feature: Feature, text: &str) -> Result<()> {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| WineError::not_numeric(feature.label(), text))?;
        self.set(feature, value)
    }

    /// Apply a submission of `(field name, text)` pairs.
    ///
    /// Field names may be labels or snake_case keys. Features not present in
    /// the submission keep their current value. Stops at the first bad
    /// field; earlier fields stay applied.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeature` for an unrecognised name, plus any error
    /// from [`InputForm::set_text`].
    pub fn apply_submission<'a, I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, text) in pairs {
            let feature: Feature = name.parse()?;
            self.set_text(feature, text)?;
        }
        Ok(())
    }

    /// Collect the current values into a record, in model input order.
    #[must_use]
    pub fn collect(&self) -> FeatureRecord {
        FeatureRecord::new(self.fields.map(|field| field.value))
    }
}
