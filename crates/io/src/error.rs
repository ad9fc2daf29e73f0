//! Error types for partknn-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the partknn-io crate.
///
/// Covers file access, the legacy parameter file, and the candidate file
/// format. Individual data rows never produce an `IoError`; they are
/// reported as [`partknn_knn::RowError`] and skipped by the ranker.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a failure while reading a file.
    #[error("failed to read {}: {reason}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps a failure while writing a file.
    #[error("failed to write {}: {reason}", path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when the parameter file is empty or malformed.
    #[error("invalid parameter file: {reason}")]
    Params {
        /// Description of the problem, naming the bad field.
        reason: String,
    },

    /// Returned when a candidate file does not start with the expected magic bytes.
    #[error("{} is not a candidate file", path.display())]
    BadMagic {
        /// Path that was inspected.
        path: PathBuf,
    },

    /// Returned when a candidate file was written by an unsupported format version.
    #[error("unsupported candidate file version {version} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file.
        version: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// Wraps an encoding or decoding error from bincode.
    #[error("candidate encoding error: {reason}")]
    Codec {
        /// Description of the underlying codec failure.
        reason: String,
    },

    /// Returned when a partition count of zero is requested.
    #[error("partitions must be >= 1, got {partitions}")]
    InvalidPartitions {
        /// The invalid partition count.
        partitions: usize,
    },
}

impl From<bincode::Error> for IoError {
    fn from(e: bincode::Error) -> Self {
        IoError::Codec {
            reason: e.to_string(),
        }
    }
}
