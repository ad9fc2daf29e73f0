//! Reading data files and cutting them into partitions.

use std::borrow::Borrow;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ByteRecordsIntoIter};
use partknn_knn::{LabeledSample, RowError};
use tracing::{debug, info};

use crate::error::IoError;
use crate::record::RecordFormat;

/// Streams the records of one data file without holding the file in memory.
///
/// Iteration stops at the first read error; [`RecordStream::finish`]
/// reports it.
///
/// # Example
///
/// ```no_run
/// use partknn_io::{PartitionRows, RecordFormat, RecordStream};
///
/// let format = RecordFormat::default();
/// let mut stream = RecordStream::open("train.csv", &format)?;
/// let rows = PartitionRows::new(stream.by_ref(), &format, 6).count();
/// stream.finish()?;
/// # Ok::<(), partknn_io::IoError>(())
/// ```
pub struct RecordStream {
    path: PathBuf,
    records: ByteRecordsIntoIter<File>,
    n_records: usize,
    error: Option<csv::Error>,
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("path", &self.path)
            .field("n_records", &self.n_records)
            .field("error", &self.error)
            .finish()
    }
}

impl RecordStream {
    /// Opens `path` for reading with the given format.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] or [`IoError::Read`].
    pub fn open<P: AsRef<Path>>(path: P, format: &RecordFormat) -> Result<Self, IoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let reader = format
            .reader_builder()
            .from_path(path)
            .map_err(|e| IoError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            records: reader.into_byte_records(),
            n_records: 0,
            error: None,
        })
    }

    /// Ends the stream, surfacing any read error that stopped iteration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Read`] if reading failed part-way.
    pub fn finish(self) -> Result<(), IoError> {
        if let Some(e) = self.error {
            return Err(IoError::Read {
                path: self.path,
                reason: e.to_string(),
            });
        }
        info!(path = %self.path.display(), n_records = self.n_records, "read data file");
        Ok(())
    }
}

impl Iterator for RecordStream {
    type Item = ByteRecord;

    fn next(&mut self) -> Option<ByteRecord> {
        if self.error.is_some() {
            return None;
        }
        match self.records.next()? {
            Ok(record) => {
                self.n_records += 1;
                Some(record)
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

/// Records of one or more data files, held in memory for splitting.
#[derive(Debug, Clone, Default)]
pub struct DataRecords {
    records: Vec<ByteRecord>,
}

impl DataRecords {
    /// Wraps already-read records.
    pub fn from_records(records: Vec<ByteRecord>) -> Self {
        Self { records }
    }

    /// Number of records, including headers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns every record.
    pub fn records(&self) -> &[ByteRecord] {
        &self.records
    }

    /// Splits the records into `n` contiguous partitions of near-equal size.
    ///
    /// Returns exactly `n` partitions; trailing ones are empty when there are
    /// fewer records than partitions.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidPartitions`] if `n` is zero.
    pub fn split(&self, n: usize) -> Result<Vec<&[ByteRecord]>, IoError> {
        if n == 0 {
            return Err(IoError::InvalidPartitions { partitions: n });
        }
        let base = self.records.len() / n;
        let extra = self.records.len() % n;
        let mut parts = Vec::with_capacity(n);
        let mut start = 0;
        for i in 0..n {
            let len = base + usize::from(i < extra);
            parts.push(&self.records[start..start + len]);
            start += len;
        }
        debug!(n_partitions = n, n_records = self.records.len(), "split input");
        Ok(parts)
    }
}

/// Reads every record of every file in `paths`, in order.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] or [`IoError::Read`] for the first file
/// that cannot be read.
pub fn read_records<P: AsRef<Path>>(
    paths: &[P],
    format: &RecordFormat,
) -> Result<DataRecords, IoError> {
    let mut records = Vec::new();
    for path in paths {
        let mut stream = RecordStream::open(path, format)?;
        records.extend(stream.by_ref());
        stream.finish()?;
    }
    Ok(DataRecords { records })
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| IoError::Read {
        path: PathBuf::from(path),
        reason: e.to_string(),
    })
}

/// Iterator over the data rows of one partition.
///
/// Header and blank records are skipped; every other record yields a parsed
/// sample or the reason it could not be parsed. `I` may yield owned records
/// (a [`RecordStream`]) or borrowed ones (a slice of [`DataRecords`]).
#[derive(Debug, Clone)]
pub struct PartitionRows<'a, I> {
    records: I,
    format: &'a RecordFormat,
    n_features: usize,
}

impl<'a, I> PartitionRows<'a, I> {
    /// Creates an iterator over `records`.
    pub fn new<T>(records: T, format: &'a RecordFormat, n_features: usize) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            records: records.into_iter(),
            format,
            n_features,
        }
    }
}

impl<I, R> Iterator for PartitionRows<'_, I>
where
    I: Iterator<Item = R>,
    R: Borrow<ByteRecord>,
{
    type Item = Result<LabeledSample, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            if let Some(row) = self.format.parse_record(record.borrow(), self.n_features) {
                return Some(row);
            }
        }
        None
    }
}

/// Splits `data` into `n` partitions of parsed rows.
///
/// # Errors
///
/// Returns [`IoError::InvalidPartitions`] if `n` is zero.
pub fn partitions<'a>(
    data: &'a DataRecords,
    n: usize,
    format: &'a RecordFormat,
    n_features: usize,
) -> Result<Vec<PartitionRows<'a, std::slice::Iter<'a, ByteRecord>>>, IoError> {
    Ok(data
        .split(n)?
        .into_iter()
        .map(|records| PartitionRows::new(records, format, n_features))
        .collect())
}
