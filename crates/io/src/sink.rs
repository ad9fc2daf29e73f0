//! Result sink: the final label, optionally followed by the neighbors.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use partknn_knn::Classification;

use crate::error::IoError;

/// Writes the classification in plain text.
///
/// The first line is the label. With `with_neighbors`, one
/// `distance<TAB>label` line per neighbor follows, nearest first.
pub fn write_text<W: Write>(
    mut writer: W,
    result: &Classification,
    with_neighbors: bool,
) -> io::Result<()> {
    writeln!(writer, "{}", result.label())?;
    if with_neighbors {
        for c in result.neighbors() {
            writeln!(writer, "{}\t{}", c.distance, c.label)?;
        }
    }
    writer.flush()
}

/// Writes the classification to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the file cannot be created or written.
pub fn write_result(
    path: Option<&Path>,
    result: &Classification,
    with_neighbors: bool,
) -> Result<(), IoError> {
    match path {
        Some(path) => {
            let write_err = |e: io::Error| IoError::Write {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
            let file = File::create(path).map_err(write_err)?;
            write_text(BufWriter::new(file), result, with_neighbors).map_err(write_err)
        }
        None => write_text(io::stdout().lock(), result, with_neighbors).map_err(|e| {
            IoError::Write {
                path: "<stdout>".into(),
                reason: e.to_string(),
            }
        }),
    }
}
