//! One-line parameter files: `k,q_0,q_1,...,q_{n-1}`.
//!
//! Only the first line is read. The number of query values determines the
//! feature count; callers check it against their configured `n_features`.

use std::path::Path;

use crate::error::IoError;
use crate::partition::read_to_string;

/// Contents of a parameter file.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Number of neighbors.
    pub k: usize,
    /// Query feature values.
    pub query: Vec<f64>,
}

/// Parses parameter-file text.
///
/// # Errors
///
/// Returns [`IoError::Params`] naming the bad field if the first line is
/// missing, k is not a positive integer, a query value is not a finite
/// number, or there are no query values.
pub fn parse_params(text: &str) -> Result<Params, IoError> {
    let line = text
        .lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| IoError::Params {
            reason: "first line is empty".to_string(),
        })?;

    let mut fields = line.split(',').map(str::trim);
    let k_field = fields.next().unwrap_or_default();
    let k: usize = k_field.parse().map_err(|_| IoError::Params {
        reason: format!("field 0 (k): cannot parse {k_field:?} as a positive integer"),
    })?;
    if k == 0 {
        return Err(IoError::Params {
            reason: "field 0 (k): must be >= 1".to_string(),
        });
    }

    let mut query = Vec::new();
    for (i, field) in fields.enumerate() {
        let value: f64 = field.parse().map_err(|_| IoError::Params {
            reason: format!("field {} (feature {i}): cannot parse {field:?} as a number", i + 1),
        })?;
        if !value.is_finite() {
            return Err(IoError::Params {
                reason: format!("field {} (feature {i}): non-finite value", i + 1),
            });
        }
        query.push(value);
    }
    if query.is_empty() {
        return Err(IoError::Params {
            reason: "no query feature values after k".to_string(),
        });
    }

    Ok(Params { k, query })
}

/// Reads and parses a parameter file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Read`] or [`IoError::Params`].
pub fn read_params(path: &Path) -> Result<Params, IoError> {
    parse_params(&read_to_string(path)?)
}
