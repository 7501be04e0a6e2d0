//! The eleven wine chemistry features and the record that holds them.
//!
//! Feature order is fixed: it is the column order the scaler and classifier
//! were fitted with, so every row handed to an artifact is built from
//! [`Feature::ALL`].

use crate::error::{Result, WineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of features in a record.
pub const FEATURE_COUNT: usize = 11;

/// One of the eleven chemical measurements used as classifier input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    FixedAcidity,
    VolatileAcidity,
    CitricAcid,
    ResidualSugar,
    Chlorides,
    FreeSulfurDioxide,
    TotalSulfurDioxide,
    Density,
    #[serde(rename = "ph")]
    PH,
    Sulphates,
    Alcohol,
}

impl Feature {
    /// All features in model input order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::FixedAcidity,
        Feature::VolatileAcidity,
        Feature::CitricAcid,
        Feature::ResidualSugar,
        Feature::Chlorides,
        Feature::FreeSulfurDioxide,
        Feature::TotalSulfurDioxide,
        Feature::Density,
        Feature::PH,
        Feature::Sulphates,
        Feature::Alcohol,
    ];

    /// Human-readable label, as shown on the form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FixedAcidity => "fixed acidity",
            Self::VolatileAcidity => "volatile acidity",
            Self::CitricAcid => "citric acid",
            Self::ResidualSugar => "residual sugar",
            Self::Chlorides => "chlorides",
            Self::FreeSulfurDioxide => "free sulfur dioxide",
            Self::TotalSulfurDioxide => "total sulfur dioxide",
            Self::Density => "density",
            Self::PH => "pH",
            Self::Sulphates => "sulphates",
            Self::Alcohol => "alcohol",
        }
    }

    /// Form field key (snake_case label).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FixedAcidity => "fixed_acidity",
            Self::VolatileAcidity => "volatile_acidity",
            Self::CitricAcid => "citric_acid",
            Self::ResidualSugar => "residual_sugar",
            Self::Chlorides => "chlorides",
            Self::FreeSulfurDioxide => "free_sulfur_dioxide",
            Self::TotalSulfurDioxide => "total_sulfur_dioxide",
            Self::Density => "density",
            Self::PH => "ph",
            Self::Sulphates => "sulphates",
            Self::Alcohol => "alcohol",
        }
    }

    /// Column position in a model input row.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Feature {
    type Err = WineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|feature| {
                feature.label().eq_ignore_ascii_case(wanted) || feature.key().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| WineError::UnknownFeature(wanted.to_string()))
    }
}

/// One value per feature, in model input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRecord {
    /// Create a record from values already in model input order.
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Create a record from a slice, which must hold exactly 11 values.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the slice length is not 11.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let values: [f64; FEATURE_COUNT] = values
            .try_into()
            .map_err(|_| WineError::shape(FEATURE_COUNT, values.len()))?;
        Ok(Self { values })
    }

    /// Create a record from labeled values, each feature exactly once.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeature` for an unrecognised label and
    /// `ShapeMismatch` when a feature is missing or repeated.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        let mut seen = 0;
        for (name, value) in pairs {
            let feature: Feature = name.parse()?;
            seen += 1;
            slots[feature.index()] = Some(value);
        }

        let present = slots.iter().filter(|slot| slot.is_some()).count();
        if seen != FEATURE_COUNT || present != FEATURE_COUNT {
            return Err(WineError::shape(FEATURE_COUNT, seen.max(present)));
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (value, slot) in values.iter_mut().zip(slots) {
            *value = slot.unwrap_or_default();
        }
        Ok(Self { values })
    }

    /// Value of one feature.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Replace the value of one feature.
    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    /// Values in model input order.
    #[must_use]
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Iterate `(feature, value)` pairs in model input order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.values.iter().copied())
    }

    /// Single model input row, narrowed to `f32` for the artifacts.
    #[must_use]
    pub fn to_row(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.key(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureRecord {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = std::collections::BTreeMap::<String, f64>::deserialize(deserializer)?;
        Self::from_pairs(map.iter().map(|(name, value)| (name.as_str(), *value)))
            .map_err(serde::de::Error::custom)
    }
}
