//! Configuration for a classification run.

use crate::error::KnnError;

/// Feature count used when none is configured.
pub const DEFAULT_N_FEATURES: usize = 6;

/// Run-wide KNN parameters.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use partknn_knn::KnnConfig;
///
/// let config = KnnConfig::new(5).with_n_features(2);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.n_features(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnnConfig {
    /// Number of nearest neighbors to retain.
    k: usize,
    /// Length of every feature vector in the run.
    n_features: usize,
}

impl KnnConfig {
    /// Creates a new configuration with the given k.
    ///
    /// Defaults: `n_features = DEFAULT_N_FEATURES`.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            n_features: DEFAULT_N_FEATURES,
        }
    }

    /// Sets the feature-vector length.
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    /// Returns the number of nearest neighbors.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the feature-vector length.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Validates this configuration.
    ///
    /// Returns an error if k < 1 or n_features < 1.
    pub fn validate(&self) -> Result<(), KnnError> {
        if self.k < 1 {
            return Err(KnnError::InvalidK { k: self.k });
        }
        if self.n_features < 1 {
            return Err(KnnError::InvalidFeatureCount {
                n_features: self.n_features,
            });
        }
        Ok(())
    }
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KnnConfig::new(7);
        assert_eq!(config.k(), 7);
        assert_eq!(config.n_features(), DEFAULT_N_FEATURES);
    }

    #[test]
    fn test_default_impl() {
        let config = KnnConfig::default();
        assert_eq!(config.k(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let config = KnnConfig::new(4).with_n_features(2);
        assert_eq!(config.k(), 4);
        assert_eq!(config.n_features(), 2);
    }

    #[test]
    fn test_validate_k_zero() {
        let config = KnnConfig::new(0);
        assert_eq!(config.validate(), Err(KnnError::InvalidK { k: 0 }));
    }

    #[test]
    fn test_validate_n_features_zero() {
        let config = KnnConfig::new(1).with_n_features(0);
        assert_eq!(
            config.validate(),
            Err(KnnError::InvalidFeatureCount { n_features: 0 })
        );
    }
}
