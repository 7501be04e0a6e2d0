//! # Wine Quality
//!
//! Good/bad wine verdicts from eleven chemistry measurements, using a
//! fitted scaler and binary classifier stored as `.apr` artifacts.
//!
//! - **Cases**: six preset wines to start from
//! - **Cycler**: Previous/Next navigation through the presets
//! - **Form**: eleven editable, non-negative fields
//! - **Predictor**: scale, classify, map `1` to good
//! - **Web**: the prediction page and a JSON API over axum

pub mod artifacts;
pub mod cases;
pub mod config;
pub mod cycler;
pub mod error;
pub mod features;
pub mod form;
pub mod predictor;
pub mod web;

pub use error::{Result, WineError};

/// Crate version, reported by the health check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-exports for convenient access
pub mod prelude {
    pub use crate::artifacts::{
        load_classifier, load_scaler, save_artifact, ArtifactInfo, Classifier,
        ConstantClassifier, Scaler, StandardScaler,
    };
    pub use crate::cases::{ExampleCase, EXAMPLE_CASES};
    pub use crate::config::{ArtifactPaths, ServerConfig};
    pub use crate::cycler::{Direction, ExampleCycler};
    pub use crate::error::{Result, WineError};
    pub use crate::features::{Feature, FeatureRecord, FEATURE_COUNT};
    pub use crate::form::InputForm;
    pub use crate::predictor::{Prediction, Predictor, Verdict};
}
