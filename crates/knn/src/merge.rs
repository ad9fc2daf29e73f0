//! Global merge of per-partition candidates.
//!
//! There is exactly one merger per run. Every partition's output is fed to
//! it, and it only releases a result once all of them have arrived.

use std::num::NonZeroUsize;

use tracing::debug;

use crate::error::KnnError;
use crate::rank::{PartitionOutput, PartitionStats};
use crate::sample::Candidate;
use crate::topk::BoundedTopK;

/// Result of a completed merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutput {
    neighbors: Vec<Candidate>,
    stats: PartitionStats,
    partitions: usize,
}

impl MergeOutput {
    /// Global nearest neighbors, ascending by distance.
    pub fn neighbors(&self) -> &[Candidate] {
        &self.neighbors
    }

    /// Row counters summed over every partition.
    pub fn stats(&self) -> PartitionStats {
        self.stats
    }

    /// Number of partitions merged.
    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Consumes the output, returning the neighbors.
    pub fn into_neighbors(self) -> Vec<Candidate> {
        self.neighbors
    }
}

/// Single-use merger of partition outputs.
///
/// # Example
///
/// ```
/// use partknn_knn::{Candidate, Merger, PartitionOutput, PartitionStats};
///
/// let mut merger = Merger::new(2, 2).unwrap();
/// merger
///     .accept(PartitionOutput::new(2, vec![Candidate::new(3.0, "a")], PartitionStats::default()))
///     .unwrap();
/// merger
///     .accept(PartitionOutput::new(2, vec![Candidate::new(1.0, "b")], PartitionStats::default()))
///     .unwrap();
///
/// let merged = merger.finish().unwrap();
/// assert_eq!(merged.neighbors()[0].label, "b");
/// ```
#[derive(Debug)]
pub struct Merger {
    top: BoundedTopK,
    expected: usize,
    received: usize,
    stats: PartitionStats,
}

impl Merger {
    /// Creates a merger for `expected` partitions ranked with `k`.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidK`] if `k` is zero.
    pub fn new(k: usize, expected: usize) -> Result<Self, KnnError> {
        let k = NonZeroUsize::new(k).ok_or(KnnError::InvalidK { k })?;
        Ok(Self {
            top: BoundedTopK::with_k(k),
            expected,
            received: 0,
            stats: PartitionStats::default(),
        })
    }

    /// Number of partitions accepted so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Folds one partition's output into the global top-k.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::KMismatch`] if the partition was ranked with a
    /// different k, or [`KnnError::NonFiniteInput`] if a candidate distance
    /// is NaN, infinite or negative.
    pub fn accept(&mut self, output: PartitionOutput) -> Result<(), KnnError> {
        if output.k() != self.top.k() {
            return Err(KnnError::KMismatch {
                expected: self.top.k(),
                got: output.k(),
            });
        }
        let (candidates, stats) = output.into_parts();
        self.accept_candidates(&candidates)?;
        self.stats += stats;
        self.received += 1;
        Ok(())
    }

    fn accept_candidates(&mut self, candidates: &[Candidate]) -> Result<(), KnnError> {
        if candidates
            .iter()
            .any(|c| !c.distance.is_finite() || c.distance < 0.0)
        {
            return Err(KnnError::NonFiniteInput {
                input: "candidate distance",
            });
        }
        for c in candidates {
            self.top.insert(c.distance, &c.label)?;
        }
        Ok(())
    }

    /// Releases the merge barrier.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::IncompleteMerge`] unless exactly the expected
    /// number of partitions was accepted.
    pub fn finish(self) -> Result<MergeOutput, KnnError> {
        if self.received != self.expected {
            return Err(KnnError::IncompleteMerge {
                expected: self.expected,
                received: self.received,
            });
        }
        debug!(
            partitions = self.received,
            n_neighbors = self.top.len(),
            "merge complete"
        );
        Ok(MergeOutput {
            neighbors: self.top.into_candidates(),
            stats: self.stats,
            partitions: self.received,
        })
    }
}

/// Merges raw candidate sets into the global top-k.
///
/// Order of sets and of candidates within them does not affect the result.
///
/// # Errors
///
/// Returns [`KnnError::InvalidK`] if `k` is zero, or
/// [`KnnError::NonFiniteInput`] for an invalid candidate distance.
#[tracing::instrument(skip_all, fields(k = k))]
pub fn merge<I, S>(k: usize, sets: I) -> Result<Vec<Candidate>, KnnError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[Candidate]>,
{
    let k = NonZeroUsize::new(k).ok_or(KnnError::InvalidK { k })?;
    let mut merger = Merger {
        top: BoundedTopK::with_k(k),
        expected: 0,
        received: 0,
        stats: PartitionStats::default(),
    };
    for set in sets {
        merger.accept_candidates(set.as_ref())?;
    }
    Ok(merger.top.into_candidates())
}
