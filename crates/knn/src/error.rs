//! Error types for the partknn-knn crate.

/// Error type for all fallible operations in the partknn-knn crate.
///
/// Every variant is a configuration-level failure that should stop a run
/// before (or instead of) producing a label. Row-level problems are reported
/// as [`RowError`] and absorbed inside a partition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KnnError {
    /// Returned when k is zero.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when the configured feature count is zero.
    #[error("n_features must be >= 1, got {n_features}")]
    InvalidFeatureCount {
        /// The invalid feature count.
        n_features: usize,
    },

    /// Returned when the query vector length does not match `n_features`.
    #[error("query length {query} does not match n_features {n_features}")]
    QueryDimensionMismatch {
        /// Length of the query vector.
        query: usize,
        /// Configured number of features.
        n_features: usize,
    },

    /// Returned when two vectors passed to the distance metric differ in length.
    #[error("vector lengths differ: {left} vs {right}")]
    DimensionMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },

    /// Returned when a required input contains NaN or infinity.
    #[error("non-finite value in {input}")]
    NonFiniteInput {
        /// Name of the input containing the non-finite value.
        input: &'static str,
    },

    /// Returned when every data row of a run had the wrong shape.
    #[error(
        "all {rows} data row(s) have the wrong number of features (expected {n_features}); \
         check n_features against the input data"
    )]
    SystemicShapeMismatch {
        /// Number of data rows that were rejected.
        rows: usize,
        /// Configured number of features.
        n_features: usize,
    },

    /// Returned when the merge barrier is released before every partition arrived.
    #[error("merge received {received} of {expected} partition(s)")]
    IncompleteMerge {
        /// Number of partitions the merger was created for.
        expected: usize,
        /// Number of partitions actually accepted.
        received: usize,
    },

    /// Returned when candidates produced with a different k reach a merger.
    #[error("partition ranked with k = {got}, merger expects k = {expected}")]
    KMismatch {
        /// The merger's k.
        expected: usize,
        /// The k the partition was ranked with.
        got: usize,
    },

    /// Returned when a majority vote is requested over no labels.
    #[error("no neighbor labels to vote on")]
    NoVotes,
}

/// Why a single data row could not be turned into a labeled sample.
///
/// Produced by the data-source layer and consumed by the partition ranker,
/// which logs and skips the row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    /// The row does not have `n_features + 1` fields.
    #[error("expected {expected} fields, got {got}")]
    FieldCount {
        /// Expected number of fields (features plus label).
        expected: usize,
        /// Actual number of fields.
        got: usize,
    },

    /// A feature field is not a number.
    #[error("column {column}: cannot parse {value:?} as a number")]
    InvalidNumber {
        /// Zero-based column index.
        column: usize,
        /// The offending field text.
        value: String,
    },

    /// A feature field parsed to NaN or infinity.
    #[error("column {column}: non-finite value")]
    NonFinite {
        /// Zero-based column index.
        column: usize,
    },

    /// The label field is empty.
    #[error("empty label")]
    EmptyLabel,

    /// A field is not valid UTF-8.
    #[error("column {column}: invalid UTF-8")]
    InvalidUtf8 {
        /// Zero-based column index.
        column: usize,
    },
}

impl RowError {
    /// Returns true when the error means the row has the wrong shape rather
    /// than unparseable content.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, RowError::FieldCount { .. })
    }
}
