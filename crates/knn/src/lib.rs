//! Partitioned k-nearest-neighbor classification.
//!
//! Each data partition independently keeps the k samples closest to the
//! query; a single merger combines every partition's candidates into the
//! global k nearest, and a majority vote over their labels gives the class.
//!
//! | Stage | Type / function | Output |
//! |-------|-----------------|--------|
//! | Distance | [`sq_euclidean`] | squared Euclidean distance |
//! | Rank | [`rank_partition`], [`PartitionRanker`] | ≤ k candidates per partition |
//! | Merge | [`Merger`], [`merge`] | global k nearest |
//! | Vote | [`majority_vote`], [`VoteTally`] | plurality label |
//!
//! Both ranking and merging are built on [`BoundedTopK`], which keeps the
//! k smallest `(distance, label)` entries. Because its contents do not
//! depend on insertion order, the merged result is the same however the
//! data is split into partitions.
//!
//! # Quick start
//!
//! ```
//! use partknn_knn::{KnnConfig, LabeledSample, QueryPoint, classify};
//!
//! let config = KnnConfig::new(3).with_n_features(2);
//! let query = QueryPoint::new(vec![0.0, 0.0], &config).unwrap();
//!
//! let left = vec![
//!     Ok(LabeledSample::new(vec![1.0, 0.0], "cat")),
//!     Ok(LabeledSample::new(vec![5.0, 5.0], "dog")),
//! ];
//! let right = vec![
//!     Ok(LabeledSample::new(vec![0.0, 1.0], "cat")),
//!     Ok(LabeledSample::new(vec![1.0, 1.0], "dog")),
//! ];
//!
//! let result = classify(vec![left, right], &query).unwrap();
//! assert_eq!(result.label(), "cat");
//! ```
//!
//! # Architecture
//!
//! ```text
//! classify()
//!   ├─ rank_all()             rayon, one rank_partition() per partition (rank.rs)
//!   │    └─ BoundedTopK       (topk.rs)
//!   ├─ merge_outputs()        single Merger, all-partitions barrier (merge.rs)
//!   └─ Classification::from_merge()
//!        └─ VoteTally         (vote.rs)
//! ```

pub mod classify;
pub mod config;
pub mod distance;
pub mod error;
pub mod merge;
pub mod rank;
pub mod sample;
pub mod topk;
pub mod vote;

pub use classify::{Classification, classify, merge_outputs, rank_all};
pub use config::{DEFAULT_N_FEATURES, KnnConfig};
pub use distance::sq_euclidean;
pub use error::{KnnError, RowError};
pub use merge::{MergeOutput, Merger, merge};
pub use rank::{PartitionOutput, PartitionRanker, PartitionStats, rank_partition, rank_samples};
pub use sample::{Candidate, FeatureVector, LabeledSample, QueryPoint};
pub use topk::BoundedTopK;
pub use vote::{VoteTally, majority_vote};
