//! Candidate files: one partition's ranking output, as written by `rank`
//! and read by `merge`.
//!
//! Layout: 8 magic bytes, then a bincode-encoded `(version, PartitionOutput)`.
//! Distances are stored as raw `f64` and labels as UTF-8, so both fields
//! round-trip exactly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use partknn_knn::PartitionOutput;
use tracing::debug;

use crate::error::IoError;

/// Leading bytes of every candidate file.
pub const MAGIC: &[u8; 8] = b"PKNNCAND";

/// Current candidate file format version.
pub const FORMAT_VERSION: u32 = 1;

/// Encodes a partition output into a byte buffer.
///
/// # Errors
///
/// Returns [`IoError::Codec`] if serialization fails.
pub fn encode(output: &PartitionOutput) -> Result<Vec<u8>, IoError> {
    let mut buf = Vec::with_capacity(64 + output.candidates().len() * 32);
    buf.extend_from_slice(MAGIC);
    bincode::serialize_into(&mut buf, &(FORMAT_VERSION, output))?;
    Ok(buf)
}

fn decode_from<R: Read>(mut reader: R, path: &Path) -> Result<PartitionOutput, IoError> {
    let mut magic = [0u8; 8];
    if reader.read_exact(&mut magic).is_err() || &magic != MAGIC {
        return Err(IoError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    let (version, output): (u32, PartitionOutput) = bincode::deserialize_from(reader)?;
    if version != FORMAT_VERSION {
        return Err(IoError::UnsupportedVersion {
            version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(output)
}

/// Decodes a partition output from a byte buffer.
///
/// # Errors
///
/// Returns [`IoError::BadMagic`], [`IoError::UnsupportedVersion`] or
/// [`IoError::Codec`].
pub fn decode(bytes: &[u8]) -> Result<PartitionOutput, IoError> {
    decode_from(bytes, Path::new("<memory>"))
}

/// Writes a candidate file.
///
/// # Errors
///
/// Returns [`IoError::Write`] on I/O failure or [`IoError::Codec`] if
/// serialization fails.
pub fn write_candidates(path: &Path, output: &PartitionOutput) -> Result<(), IoError> {
    let write_err = |e: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(MAGIC).map_err(write_err)?;
    bincode::serialize_into(&mut writer, &(FORMAT_VERSION, output))?;
    writer.flush().map_err(write_err)?;
    debug!(
        path = %path.display(),
        n_candidates = output.candidates().len(),
        "wrote candidate file"
    );
    Ok(())
}

/// Reads a candidate file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Read`],
/// [`IoError::BadMagic`], [`IoError::UnsupportedVersion`] or [`IoError::Codec`].
pub fn read_candidates(path: &Path) -> Result<PartitionOutput, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode_from(BufReader::new(file), path)
}
