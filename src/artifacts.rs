//! Scaler and classifier artifacts.
//!
//! Both are opaque, externally produced objects reached only through the
//! [`Scaler`] and [`Classifier`] capability traits. On disk they live in
//! aprender's `.apr` container: the classifier as an aprender
//! `LogisticRegression`, the scaler as a [`StandardScaler`].

use crate::error::{Result, WineError};
use crate::features::FEATURE_COUNT;
use aprender::classification::LogisticRegression;
use aprender::format::{self, ModelInfo, ModelType, SaveOptions};
use aprender::primitives::Matrix;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

/// Fitted per-feature normalization.
pub trait Scaler: Send + Sync {
    /// Number of columns the scaler was fitted on; `None` if unknown.
    fn n_features(&self) -> Option<usize>;

    /// Transform rows; output has the same shape as input.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if a row has the wrong width.
    fn transform(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;
}

/// Fitted binary classifier.
pub trait Classifier: Send + Sync {
    /// Number of columns the classifier was fitted on; `None` if unfitted
    /// or unknown.
    fn n_features(&self) -> Option<usize>;

    /// One class label per row (expected `0` or `1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be fed to the model.
    fn predict(&self, rows: &[Vec<f32>]) -> Result<Vec<usize>>;
}

/// Standardization with fixed parameters: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: Vec<f32>,
    /// Per-feature standard deviation
    pub scale: Vec<f32>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleArtifact` if the two vectors differ in length.
    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(WineError::incompatible(format!(
                "scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            )));
        }
        Ok(Self { mean, scale })
    }

    /// A scaler that leaves `n` columns unchanged.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> Option<usize> {
        Some(self.mean.len())
    }

    fn transform(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.mean.len() {
                    return Err(WineError::shape(self.mean.len(), row.len()));
                }
                Ok(row
                    .iter()
                    .zip(self.mean.iter().zip(&self.scale))
                    .map(|(&x, (&mean, &scale))| {
                        // Constant columns were fitted with zero spread.
                        let scale = if scale == 0.0 { 1.0 } else { scale };
                        (x - mean) / scale
                    })
                    .collect())
            })
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> Option<usize> {
        // Coefficients are private; their serde form is
        // `{"coefficients": {"data": [..]}}`, or null before fitting.
        let value = serde_json::to_value(self).ok()?;
        let coefficients = value.get("coefficients")?;
        let data = coefficients.get("data").unwrap_or(coefficients);
        data.as_array().map(Vec::len)
    }

    fn predict(&self, rows: &[Vec<f32>]) -> Result<Vec<usize>> {
        let n_cols = Classifier::n_features(self)
            .ok_or_else(|| WineError::incompatible("logistic regression is not fitted"))?;
        if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(WineError::shape(n_cols, bad.len()));
        }
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        let x = Matrix::from_vec(rows.len(), n_cols, data)
            .map_err(|e| WineError::Aprender(e.to_string()))?;
        Ok(LogisticRegression::predict(self, &x))
    }
}

/// Classifier that answers the same label for every row.
///
/// Pins a known output when exercising the prediction path without a
/// trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantClassifier {
    label: usize,
    width: usize,
}

impl ConstantClassifier {
    /// Create a classifier over eleven features that always predicts `label`.
    #[must_use]
    pub fn new(label: usize) -> Self {
        Self {
            label,
            width: FEATURE_COUNT,
        }
    }

    /// Accept rows of `width` columns instead.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

impl Classifier for ConstantClassifier {
    fn n_features(&self) -> Option<usize> {
        Some(self.width)
    }

    fn predict(&self, rows: &[Vec<f32>]) -> Result<Vec<usize>> {
        if let Some(bad) = rows.iter().find(|row| row.len() != self.width) {
            return Err(WineError::shape(self.width, bad.len()));
        }
        Ok(vec![self.label; rows.len()])
    }
}

/// Metadata of an `.apr` artifact, read without loading its payload.
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    inner: ModelInfo,
}

impl ArtifactInfo {
    /// Inspect an artifact file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = ensure_exists(path.as_ref())?;
        let info = format::inspect(path).map_err(|e| WineError::Aprender(e.to_string()))?;
        Ok(Self { inner: info })
    }

    /// Inspect artifact bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be parsed.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let info =
            format::inspect_bytes(data).map_err(|e| WineError::Aprender(e.to_string()))?;
        Ok(Self { inner: info })
    }

    /// Model type recorded in the header.
    #[must_use]
    pub fn model_type(&self) -> ModelType {
        self.inner.model_type
    }

    /// Format version (major, minor).
    #[must_use]
    pub fn version(&self) -> (u8, u8) {
        self.inner.format_version
    }

    /// Artifact name if available.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.metadata.model_name.as_deref()
    }

    /// Artifact description if available.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.inner.metadata.description.as_deref()
    }

    /// Check if the payload is compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.inner.payload_size < self.inner.uncompressed_size
    }

    /// Check if the payload is encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.inner.encrypted
    }

    /// Check if the artifact is signed.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.inner.signed
    }

    /// Stored payload size in bytes.
    #[must_use]
    pub fn payload_size(&self) -> usize {
        self.inner.payload_size
    }
}

fn ensure_exists(path: &Path) -> Result<&Path> {
    if path.exists() {
        Ok(path)
    } else {
        Err(WineError::ArtifactNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Save an artifact in `.apr` format.
///
/// # Errors
///
/// Returns an error if serialization or file writing fails.
pub fn save_artifact<M: Serialize>(
    artifact: &M,
    model_type: ModelType,
    path: impl AsRef<Path>,
    options: SaveOptions,
) -> Result<()> {
    format::save(artifact, model_type, path, options)
        .map_err(|e| WineError::Aprender(e.to_string()))
}

/// Load an artifact from `.apr` format.
///
/// # Errors
///
/// Returns `ArtifactNotFound` if the file does not exist, or an aprender
/// error if it is corrupt or of another model type.
pub fn load_artifact<M: DeserializeOwned>(
    path: impl AsRef<Path>,
    expected_type: ModelType,
) -> Result<M> {
    let path = ensure_exists(path.as_ref())?;
    format::load(path, expected_type).map_err(|e| WineError::Aprender(e.to_string()))
}

/// Load a [`StandardScaler`] artifact.
///
/// # Errors
///
/// See [`load_artifact`]; also `IncompatibleArtifact` for mismatched
/// parameter vectors.
pub fn load_scaler(path: impl AsRef<Path>) -> Result<StandardScaler> {
    let scaler: StandardScaler = load_artifact(path, ModelType::Custom)?;
    StandardScaler::new(scaler.mean, scaler.scale)
}

/// Load a logistic regression classifier artifact.
///
/// # Errors
///
/// See [`load_artifact`].
pub fn load_classifier(path: impl AsRef<Path>) -> Result<LogisticRegression> {
    load_artifact(path, ModelType::LogisticRegression)
}
