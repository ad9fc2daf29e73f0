//! Squared Euclidean distance.

use crate::error::KnnError;

/// Computes the squared Euclidean distance between `a` and `b`.
///
/// ```text
/// d = Σᵢ (a[i] − b[i])²
/// ```
///
/// The square root is not taken; it is monotone and ranking only needs order.
///
/// # Errors
///
/// Returns [`KnnError::DimensionMismatch`] if the slices differ in length.
pub fn sq_euclidean(a: &[f64], b: &[f64]) -> Result<f64, KnnError> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(sq_euclidean_unchecked(a, b))
}

#[inline]
pub(crate) fn sq_euclidean_unchecked(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
