//! Per-partition ranking: one partition's rows in, at most k candidates out.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::sq_euclidean_unchecked;
use crate::error::{KnnError, RowError};
use crate::sample::{Candidate, LabeledSample, QueryPoint};
use crate::topk::BoundedTopK;

/// Row counters for one partition (or, summed, for a whole run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    /// Rows ranked against the query.
    pub accepted: usize,
    /// Rows skipped because their content could not be parsed.
    pub malformed: usize,
    /// Rows skipped because their feature count differs from the query's.
    pub shape_mismatch: usize,
}

impl PartitionStats {
    /// Total data rows seen, valid or not.
    pub fn data_rows(&self) -> usize {
        self.accepted + self.malformed + self.shape_mismatch
    }

    /// Fails if there was at least one data row and every one of them had the
    /// wrong shape, which points at a misconfigured feature count rather than
    /// at isolated bad rows.
    pub fn check_systemic(&self, n_features: usize) -> Result<(), KnnError> {
        if self.shape_mismatch > 0 && self.shape_mismatch == self.data_rows() {
            return Err(KnnError::SystemicShapeMismatch {
                rows: self.shape_mismatch,
                n_features,
            });
        }
        Ok(())
    }
}

impl AddAssign for PartitionStats {
    fn add_assign(&mut self, rhs: Self) {
        self.accepted += rhs.accepted;
        self.malformed += rhs.malformed;
        self.shape_mismatch += rhs.shape_mismatch;
    }
}

/// What a partition hands to the merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionOutput {
    k: usize,
    candidates: Vec<Candidate>,
    stats: PartitionStats,
}

impl PartitionOutput {
    /// Assembles a partition output, e.g. one produced by another process.
    pub fn new(k: usize, candidates: Vec<Candidate>, stats: PartitionStats) -> Self {
        Self {
            k,
            candidates,
            stats,
        }
    }

    /// The k the partition was ranked with.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Local nearest candidates, ascending by distance.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Row counters for this partition.
    pub fn stats(&self) -> PartitionStats {
        self.stats
    }

    /// Splits the output into its candidates and stats.
    pub fn into_parts(self) -> (Vec<Candidate>, PartitionStats) {
        (self.candidates, self.stats)
    }
}

/// Incremental ranker for a single partition.
///
/// Owns a fresh [`BoundedTopK`]; nothing carries over between partitions or
/// runs. Use [`rank_partition`] when the rows are already an iterator.
#[derive(Debug)]
pub struct PartitionRanker<'q> {
    query: &'q QueryPoint,
    top: BoundedTopK,
    stats: PartitionStats,
    row: usize,
}

impl<'q> PartitionRanker<'q> {
    /// Creates a ranker for `query`.
    pub fn new(query: &'q QueryPoint) -> Self {
        Self {
            query,
            top: BoundedTopK::with_k(query.k_nonzero()),
            stats: PartitionStats::default(),
            row: 0,
        }
    }

    /// Ranks one sample.
    ///
    /// Samples of the wrong dimension are counted as shape mismatches, and
    /// samples whose distance to the query overflows are counted as
    /// malformed. Both are skipped.
    pub fn observe(&mut self, sample: &LabeledSample) {
        self.row += 1;
        let features = sample.features().as_slice();
        let query = self.query.features().as_slice();
        if features.len() != query.len() {
            debug!(
                row = self.row,
                got = features.len(),
                expected = query.len(),
                "skipping row: feature count mismatch"
            );
            self.stats.shape_mismatch += 1;
            return;
        }
        // Finite features can still overflow once squared and summed.
        let d = sq_euclidean_unchecked(features, query);
        if self.top.insert(d, sample.label()).is_err() {
            debug!(row = self.row, "skipping row: distance is not finite");
            self.stats.malformed += 1;
            return;
        }
        self.stats.accepted += 1;
    }

    /// Ranks a row from the data source, absorbing row errors.
    pub fn observe_row(&mut self, row: Result<LabeledSample, RowError>) {
        match row {
            Ok(sample) => self.observe(&sample),
            Err(e) => {
                self.row += 1;
                debug!(row = self.row, error = %e, "skipping malformed row");
                if e.is_shape_mismatch() {
                    self.stats.shape_mismatch += 1;
                } else {
                    self.stats.malformed += 1;
                }
            }
        }
    }

    /// Finishes the partition, emitting its local top-k.
    pub fn finish(self) -> PartitionOutput {
        PartitionOutput::new(self.query.k(), self.top.into_candidates(), self.stats)
    }
}

/// Ranks every row of one partition against `query`.
///
/// Returns at most `query.k()` candidates ascending by distance. Row errors
/// and wrong-dimension samples are skipped and counted in the stats; an
/// empty partition yields no candidates.
#[tracing::instrument(skip_all, fields(k = query.k()))]
pub fn rank_partition<I>(rows: I, query: &QueryPoint) -> PartitionOutput
where
    I: IntoIterator<Item = Result<LabeledSample, RowError>>,
{
    let mut ranker = PartitionRanker::new(query);
    for row in rows {
        ranker.observe_row(row);
    }
    let output = ranker.finish();
    debug!(
        accepted = output.stats.accepted,
        skipped = output.stats.malformed + output.stats.shape_mismatch,
        n_candidates = output.candidates.len(),
        "partition ranked"
    );
    output
}

/// Ranks already-parsed samples; convenience wrapper over [`rank_partition`].
pub fn rank_samples<I>(samples: I, query: &QueryPoint) -> PartitionOutput
where
    I: IntoIterator<Item = LabeledSample>,
{
    rank_partition(samples.into_iter().map(Ok), query)
}
