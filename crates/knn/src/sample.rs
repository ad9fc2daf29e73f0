//! Feature vectors, labeled samples, the query point and candidates.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::config::KnnConfig;
use crate::distance::sq_euclidean;
use crate::error::KnnError;

/// Fixed-length, immutable vector of features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Box<[f64]>);

impl FeatureVector {
    /// Wraps `values` as an immutable feature vector.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values.into_boxed_slice())
    }

    /// Returns the features as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the vector has no features.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if every feature is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Squared Euclidean distance to `other`.
    pub fn sq_distance(&self, other: &FeatureVector) -> Result<f64, KnnError> {
        sq_euclidean(&self.0, &other.0)
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// One row of training data.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    features: FeatureVector,
    label: String,
}

impl LabeledSample {
    /// Creates a sample from its features and label.
    pub fn new(features: impl Into<FeatureVector>, label: impl Into<String>) -> Self {
        Self {
            features: features.into(),
            label: label.into(),
        }
    }

    /// Returns the feature vector.
    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    /// Returns the class label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The point being classified, together with the number of neighbors to keep.
///
/// Built once per run and shared read-only with every partition.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPoint {
    features: FeatureVector,
    k: NonZeroUsize,
}

impl QueryPoint {
    /// Creates a validated query point.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError`] if the config is invalid, the feature count does
    /// not match `config.n_features()`, or any feature is non-finite.
    pub fn new(features: Vec<f64>, config: &KnnConfig) -> Result<Self, KnnError> {
        config.validate()?;
        let k = NonZeroUsize::new(config.k()).ok_or(KnnError::InvalidK { k: config.k() })?;
        if features.len() != config.n_features() {
            return Err(KnnError::QueryDimensionMismatch {
                query: features.len(),
                n_features: config.n_features(),
            });
        }
        let features = FeatureVector::new(features);
        if !features.is_finite() {
            return Err(KnnError::NonFiniteInput { input: "query" });
        }
        Ok(Self { features, k })
    }

    /// Returns the query features.
    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    /// Returns the number of neighbors to retain.
    pub fn k(&self) -> usize {
        self.k.get()
    }

    pub(crate) fn k_nonzero(&self) -> NonZeroUsize {
        self.k
    }

    /// Returns the feature count every sample must match.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

/// A `(distance, label)` pair emitted by ranking.
///
/// Carries no ordering of its own; ranking structures key on distance
/// (then label) internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Squared Euclidean distance from the sample to the query.
    pub distance: f64,
    /// Label of the sample.
    pub label: String,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(distance: f64, label: impl Into<String>) -> Self {
        Self {
            distance,
            label: label.into(),
        }
    }
}
