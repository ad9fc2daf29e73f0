//! JSON run report.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use partknn_knn::{Candidate, Classification, PartitionStats};

/// Serializable summary of one classification.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Winning label.
    pub label: &'a str,
    /// Number of neighbors requested.
    pub k: usize,
    /// Partitions that fed the merge.
    pub partitions: usize,
    /// Global nearest neighbors, ascending by distance.
    pub neighbors: &'a [Candidate],
    /// Per-label vote counts, in first-seen order.
    pub votes: Vec<Vote<'a>>,
    /// Row counts summed over all partitions.
    pub stats: PartitionStats,
}

/// Votes received by one label.
#[derive(Debug, Serialize)]
pub struct Vote<'a> {
    /// The label.
    pub label: &'a str,
    /// Number of neighbors carrying it.
    pub count: usize,
}

impl<'a> Report<'a> {
    /// Builds the report for `result`, classified with `k` neighbors.
    pub fn new(result: &'a Classification, k: usize) -> Self {
        Self {
            label: result.label(),
            k,
            partitions: result.partitions(),
            neighbors: result.neighbors(),
            votes: result
                .tally()
                .iter()
                .map(|(label, count)| Vote { label, count })
                .collect(),
            stats: result.stats(),
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }
}

/// Writes the JSON report for `result` to `path`.
pub fn write_report(path: &Path, result: &Classification, k: usize) -> Result<()> {
    let json = Report::new(result, k).to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}
