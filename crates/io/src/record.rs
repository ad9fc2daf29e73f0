//! Delimited text records: `f_0,...,f_{n-1},label`.

use std::str;

use csv::{ByteRecord, ReaderBuilder, Trim};
use partknn_knn::{LabeledSample, RowError};

/// Prefix of the header line written by the data generators.
pub const DEFAULT_HEADER_PREFIX: &str = "feature_0";

/// How data rows are laid out.
///
/// Fields are split by the `csv` reader, so quoted fields may contain the
/// delimiter. Every field is trimmed. Records may have any number of fields;
/// the count is checked against the feature count when a row is parsed.
///
/// # Example
///
/// ```
/// use partknn_io::RecordFormat;
///
/// let format = RecordFormat::default().with_delimiter(b';');
/// let sample = format.parse_line("1.5;2;cat", 2).unwrap().unwrap();
/// assert_eq!(sample.label(), "cat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormat {
    /// Field separator.
    delimiter: u8,
    /// Records whose first field starts with this prefix are headers.
    /// `None` disables header detection.
    header_prefix: Option<String>,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header_prefix: Some(DEFAULT_HEADER_PREFIX.to_string()),
        }
    }
}

impl RecordFormat {
    /// Set the field separator.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the header prefix, or `None` to treat every non-blank record as data.
    pub fn with_header_prefix(mut self, prefix: Option<impl Into<String>>) -> Self {
        self.header_prefix = prefix.map(Into::into);
        self
    }

    /// Returns the field separator.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Returns the header prefix.
    pub fn header_prefix(&self) -> Option<&str> {
        self.header_prefix.as_deref()
    }

    /// A `csv` reader builder configured for this format.
    pub fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.delimiter);
        builder
    }

    /// Returns true for records that carry no data: blank lines and headers.
    pub fn is_skippable(&self, record: &ByteRecord) -> bool {
        let first = record.get(0).unwrap_or_default();
        (record.len() <= 1 && first.is_empty())
            || self
                .header_prefix
                .as_deref()
                .is_some_and(|p| first.starts_with(p.as_bytes()))
    }

    /// Parses one record into a labeled sample with `n_features` features.
    ///
    /// Returns `None` for blank and header records, `Some(Err(_))` for rows
    /// that cannot be parsed.
    pub fn parse_record(
        &self,
        record: &ByteRecord,
        n_features: usize,
    ) -> Option<Result<LabeledSample, RowError>> {
        if self.is_skippable(record) {
            return None;
        }
        Some(parse_fields(record, n_features))
    }

    /// Parses a single line of text; see [`RecordFormat::parse_record`].
    pub fn parse_line(
        &self,
        line: &str,
        n_features: usize,
    ) -> Option<Result<LabeledSample, RowError>> {
        let mut reader = self.reader_builder().from_reader(line.as_bytes());
        let mut record = ByteRecord::new();
        match reader.read_byte_record(&mut record) {
            Ok(true) => self.parse_record(&record, n_features),
            Ok(false) | Err(_) => None,
        }
    }
}

fn parse_fields(record: &ByteRecord, n_features: usize) -> Result<LabeledSample, RowError> {
    if record.len() != n_features + 1 {
        return Err(RowError::FieldCount {
            expected: n_features + 1,
            got: record.len(),
        });
    }

    let mut features = Vec::with_capacity(n_features);
    for (column, field) in record.iter().take(n_features).enumerate() {
        let value = str::from_utf8(field)
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or_else(|| RowError::InvalidNumber {
                column,
                value: String::from_utf8_lossy(field).into_owned(),
            })?;
        if !value.is_finite() {
            return Err(RowError::NonFinite { column });
        }
        features.push(value);
    }

    let label = str::from_utf8(&record[n_features])
        .map_err(|_| RowError::InvalidUtf8 { column: n_features })?;
    if label.is_empty() {
        return Err(RowError::EmptyLabel);
    }
    Ok(LabeledSample::new(features, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_features() {
        let f = RecordFormat::default();
        let s = f
            .parse_line("1, 2, 3, 4, 5, 6, Toyota", 6)
            .unwrap()
            .unwrap();
        assert_eq!(s.features().as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(s.label(), "Toyota");
    }

    #[test]
    fn test_header_skipped() {
        let f = RecordFormat::default();
        assert!(f.parse_line("feature_0,feature_1,target", 2).is_none());
        assert!(f.parse_line("  feature_0 ,feature_1,target", 2).is_none());
    }

    #[test]
    fn test_blank_skipped() {
        let f = RecordFormat::default();
        assert!(f.parse_line("", 2).is_none());
        assert!(f.parse_line("   \r", 2).is_none());
    }

    #[test]
    fn test_header_detection_disabled() {
        let f = RecordFormat::default().with_header_prefix(None::<&str>);
        let row = f.parse_line("feature_0,feature_1,target", 2).unwrap();
        assert!(matches!(row, Err(RowError::InvalidNumber { column: 0, .. })));
    }

    #[test]
    fn test_custom_header_prefix() {
        let f = RecordFormat::default()
            .with_delimiter(b';')
            .with_header_prefix(Some("x0"));
        assert!(f.parse_line("x0;x1;y", 2).is_none());
        assert_eq!(f.header_prefix(), Some("x0"));
    }

    #[test]
    fn test_crlf_trimmed() {
        let f = RecordFormat::default();
        let s = f.parse_line("0.5,1.5,a\r\n", 2).unwrap().unwrap();
        assert_eq!(s.label(), "a");
    }

    #[test]
    fn test_quoted_label_keeps_delimiter() {
        let f = RecordFormat::default();
        let s = f.parse_line("1,2,\"coupe, sport\"", 2).unwrap().unwrap();
        assert_eq!(s.label(), "coupe, sport");
    }

    #[test]
    fn test_too_few_fields() {
        let f = RecordFormat::default();
        let row = f.parse_line("1,2,a", 6).unwrap();
        assert_eq!(
            row,
            Err(RowError::FieldCount {
                expected: 7,
                got: 3
            })
        );
    }

    #[test]
    fn test_too_many_fields() {
        let f = RecordFormat::default();
        let row = f.parse_line("1,2,3,a", 2).unwrap();
        assert!(row.unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_bad_number() {
        let f = RecordFormat::default();
        let row = f.parse_line("1,abc,a", 2).unwrap();
        assert_eq!(
            row,
            Err(RowError::InvalidNumber {
                column: 1,
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_non_finite() {
        let f = RecordFormat::default();
        let row = f.parse_line("NaN,1,a", 2).unwrap();
        assert_eq!(row, Err(RowError::NonFinite { column: 0 }));
    }

    #[test]
    fn test_empty_label() {
        let f = RecordFormat::default();
        assert_eq!(f.parse_line("1,2, ", 2).unwrap(), Err(RowError::EmptyLabel));
    }

    #[test]
    fn test_invalid_utf8_label() {
        let f = RecordFormat::default();
        let record = ByteRecord::from(vec![&b"1"[..], &b"\xff\xfe"[..]]);
        assert_eq!(
            f.parse_record(&record, 1).unwrap(),
            Err(RowError::InvalidUtf8 { column: 1 })
        );
    }

    #[test]
    fn test_tab_delimiter() {
        let f = RecordFormat::default().with_delimiter(b'\t');
        let s = f.parse_line("3\t4\tdog", 2).unwrap().unwrap();
        assert_eq!(s.features().as_slice(), &[3.0, 4.0]);
        assert_eq!(f.delimiter(), b'\t');
    }
}
