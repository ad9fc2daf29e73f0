//! # partknn-io
//!
//! File-facing collaborators of the KNN core: delimited training records
//! read with the `csv` crate (streamed per file, or held in memory for
//! contiguous partitioning), the one-line parameter file, the binary
//! candidate file exchanged between `rank` and `merge`, and the plain-text
//! result sink.

mod error;
mod params;
mod partition;
mod record;
mod sink;
mod wire;

pub use error::IoError;
pub use params::{Params, parse_params, read_params};
pub use partition::{DataRecords, PartitionRows, RecordStream, partitions, read_records};
pub use record::{DEFAULT_HEADER_PREFIX, RecordFormat};
pub use sink::{write_result, write_text};
pub use wire::{FORMAT_VERSION, MAGIC, decode, encode, read_candidates, write_candidates};
