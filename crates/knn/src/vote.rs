//! Majority vote over neighbor labels.

use std::collections::HashMap;

use crate::error::KnnError;

/// Label frequencies, remembering the order in which labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    /// (label, count) in first-seen order.
    counts: Vec<(String, usize)>,
}

impl VoteTally {
    /// Counts every label in `labels`.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            match index.get(label) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(label.to_owned(), counts.len());
                    counts.push((label.to_owned(), 1));
                }
            }
        }
        Self { counts }
    }

    /// Total number of votes.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Votes for `label`.
    pub fn count(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, c)| *c)
    }

    /// Iterates `(label, count)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// The label with the most votes and its count.
    ///
    /// Ties go to the label seen first. When the labels come from a merge
    /// (ascending by distance, then label) that is the label of the nearest
    /// tied neighbor, so the result is reproducible for the same input.
    pub fn winner(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in self.iter() {
            if best.is_none_or(|(_, b)| count > b) {
                best = Some((label, count));
            }
        }
        best
    }
}

/// Returns the plurality label of `labels`.
///
/// # Errors
///
/// Returns [`KnnError::NoVotes`] if `labels` is empty.
///
/// # Example
///
/// ```
/// use partknn_knn::majority_vote;
///
/// assert_eq!(majority_vote(["A", "A", "B"]).unwrap(), "A");
/// assert_eq!(majority_vote(["B", "A"]).unwrap(), "B");
/// ```
pub fn majority_vote<I, S>(labels: I) -> Result<String, KnnError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    VoteTally::from_labels(labels)
        .winner()
        .map(|(label, _)| label.to_owned())
        .ok_or(KnnError::NoVotes)
}
