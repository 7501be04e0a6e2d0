//! Predictor adapter: scale, classify, and map the class to a verdict.

use crate::artifacts::{self, Classifier, Scaler};
use crate::error::{Result, WineError};
use crate::features::{FeatureRecord, FEATURE_COUNT};
use crate::form::InputForm;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Binary quality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Bad,
}

impl Verdict {
    /// Map a classifier label: `1` is good, anything else is bad.
    #[must_use]
    pub fn from_label(label: usize) -> Self {
        if label == 1 {
            Self::Good
        } else {
            Self::Bad
        }
    }

    /// Text shown to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good Quality",
            Self::Bad => "Bad Quality",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A verdict together with the exact inputs that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub verdict: Verdict,
    pub features: FeatureRecord,
}

/// Scaler and classifier, loaded once and shared read-only.
#[derive(Clone)]
pub struct Predictor {
    scaler: Arc<dyn Scaler>,
    classifier: Arc<dyn Classifier>,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor")
            .field("n_features", &self.scaler.n_features())
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Wrap already-loaded artifacts.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleArtifact` if either artifact is unfitted or was
    /// fitted on a number of columns other than eleven.
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Arc<dyn Classifier>) -> Result<Self> {
        check_width("scaler", scaler.n_features())?;
        check_width("classifier", classifier.n_features())?;
        Ok(Self { scaler, classifier })
    }

    /// Load both artifacts from `.apr` files.
    ///
    /// # Errors
    ///
    /// Any failure here is a startup failure: missing, corrupt or
    /// incompatible artifacts.
    pub fn load(scaler_path: impl AsRef<Path>, model_path: impl AsRef<Path>) -> Result<Self> {
        let scaler_path = scaler_path.as_ref();
        let model_path = model_path.as_ref();

        let scaler = artifacts::load_scaler(scaler_path)?;
        log::info!("loaded scaler from {}", scaler_path.display());
        let classifier = artifacts::load_classifier(model_path)?;
        log::info!("loaded classifier from {}", model_path.display());

        Self::new(Arc::new(scaler), Arc::new(classifier))
    }

    /// Classify one record.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if an artifact produces output of the wrong
    /// shape, or any error raised by the artifacts themselves.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Verdict> {
        let rows = vec![record.to_row()];
        let scaled = self.scaler.transform(&rows)?;
        if let Some(row) = scaled.first() {
            if row.len() != FEATURE_COUNT {
                return Err(WineError::shape(FEATURE_COUNT, row.len()));
            }
        }
        let labels = self.classifier.predict(&scaled)?;
        let label = *labels
            .first()
            .ok_or_else(|| WineError::shape(1, labels.len()))?;

        let verdict = Verdict::from_label(label);
        log::debug!("classifier label {label} -> {verdict}");
        Ok(verdict)
    }

    /// Classify raw values, echoing the record used.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` unless exactly eleven values are given,
    /// `NegativeValue`/`NotNumeric` for values the form would refuse, plus
    /// any error from [`Predictor::predict`].
    pub fn predict_values(&self, values: &[f64]) -> Result<Prediction> {
        let features = InputForm::from_values(values)?.collect();
        let verdict = self.predict(&features)?;
        Ok(Prediction { verdict, features })
    }
}
fn check_width(artifact: &str, n_features: Option<usize>) -> Result<()> {
    match n_features {
        Some(FEATURE_COUNT) => Ok(()),
        Some(n) => Err(WineError::incompatible(format!(
            "{artifact} fitted on {n} features, expected {FEATURE_COUNT}"
        ))),
        None => Err(WineError::incompatible(format!("{artifact} is not fitted"))),
    }
}
