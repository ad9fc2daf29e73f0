//! End-to-end classification: rank partitions in parallel, merge, vote.

use rayon::prelude::*;
use tracing::info;

use crate::error::{KnnError, RowError};
use crate::merge::{MergeOutput, Merger};
use crate::rank::{PartitionOutput, PartitionStats, rank_partition};
use crate::sample::{Candidate, LabeledSample, QueryPoint};
use crate::vote::VoteTally;

/// Final result of a classification run.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    label: String,
    neighbors: Vec<Candidate>,
    tally: VoteTally,
    stats: PartitionStats,
    partitions: usize,
}

impl Classification {
    /// Resolves a completed merge into a label.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::SystemicShapeMismatch`] if every data row had the
    /// wrong shape, or [`KnnError::NoVotes`] if no candidates survived.
    pub fn from_merge(merged: MergeOutput, n_features: usize) -> Result<Self, KnnError> {
        let stats = merged.stats();
        stats.check_systemic(n_features)?;
        let partitions = merged.partitions();
        let neighbors = merged.into_neighbors();
        let tally = VoteTally::from_labels(neighbors.iter().map(|c| c.label.as_str()));
        let label = tally
            .winner()
            .map(|(label, _)| label.to_owned())
            .ok_or(KnnError::NoVotes)?;
        Ok(Self {
            label,
            neighbors,
            tally,
            stats,
            partitions,
        })
    }

    /// The winning label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The k global nearest neighbors, ascending by distance.
    pub fn neighbors(&self) -> &[Candidate] {
        &self.neighbors
    }

    /// Vote counts over the neighbors.
    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    /// Row counters summed over every partition.
    pub fn stats(&self) -> PartitionStats {
        self.stats
    }

    /// Number of partitions that contributed.
    pub fn partitions(&self) -> usize {
        self.partitions
    }
}

/// Ranks every partition in parallel and feeds the outputs to one merger.
///
/// Partitions share nothing but the read-only query.
pub fn rank_all<P>(partitions: Vec<P>, query: &QueryPoint) -> Vec<PartitionOutput>
where
    P: IntoIterator<Item = Result<LabeledSample, RowError>> + Send,
{
    partitions
        .into_par_iter()
        .map(|rows| rank_partition(rows, query))
        .collect()
}

/// Merges partition outputs behind the all-partitions barrier.
///
/// # Errors
///
/// Propagates [`Merger::accept`] and [`Merger::finish`] errors.
pub fn merge_outputs<I>(k: usize, outputs: I) -> Result<MergeOutput, KnnError>
where
    I: IntoIterator<Item = PartitionOutput>,
    I::IntoIter: ExactSizeIterator,
{
    let outputs = outputs.into_iter();
    let mut merger = Merger::new(k, outputs.len())?;
    for output in outputs {
        merger.accept(output)?;
    }
    merger.finish()
}

/// Classifies `query` against the given partitions.
///
/// # Errors
///
/// Returns [`KnnError`] on a systemic shape mismatch or when no valid
/// sample exists in any partition.
///
/// # Example
///
/// ```
/// use partknn_knn::{KnnConfig, LabeledSample, QueryPoint, classify};
///
/// let config = KnnConfig::new(3).with_n_features(1);
/// let query = QueryPoint::new(vec![0.0], &config).unwrap();
/// let p1 = vec![Ok(LabeledSample::new(vec![1.0], "a")), Ok(LabeledSample::new(vec![9.0], "b"))];
/// let p2 = vec![Ok(LabeledSample::new(vec![2.0], "a")), Ok(LabeledSample::new(vec![3.0], "b"))];
///
/// let result = classify(vec![p1, p2], &query).unwrap();
/// assert_eq!(result.label(), "a");
/// assert_eq!(result.neighbors().len(), 3);
/// ```
#[tracing::instrument(skip_all, fields(k = query.k(), n_partitions = partitions.len()))]
pub fn classify<P>(partitions: Vec<P>, query: &QueryPoint) -> Result<Classification, KnnError>
where
    P: IntoIterator<Item = Result<LabeledSample, RowError>> + Send,
{
    let outputs = rank_all(partitions, query);
    let merged = merge_outputs(query.k(), outputs)?;
    let result = Classification::from_merge(merged, query.n_features())?;
    info!(
        label = result.label(),
        accepted = result.stats.accepted,
        skipped = result.stats.malformed + result.stats.shape_mismatch,
        "classification complete"
    );
    Ok(result)
}
