//! Integration test: data files -> partitions -> classification.

use std::fs;
use std::path::PathBuf;

use partknn_io::{PartitionRows, RecordFormat, RecordStream, partitions, read_records};
use partknn_knn::rank_partition;
use partknn_knn::{KnnConfig, QueryPoint, classify};

const HEADER: &str = "feature_0,feature_1,feature_2,feature_3,feature_4,feature_5,target";

fn write_file(dir: &tempfile::TempDir, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut text = String::from(HEADER);
    text.push('\n');
    for r in rows {
        text.push_str(r);
        text.push('\n');
    }
    fs::write(&path, text).expect("write data file");
    path
}

fn row(i: usize) -> String {
    let label = ["sedan", "suv", "truck"][i % 3];
    let v = i as f64 * 0.25;
    format!("{v},{v},{v},{v},{v},{v},{label}")
}

fn query() -> QueryPoint {
    QueryPoint::new(vec![2.0; 6], &KnnConfig::new(5)).unwrap()
}

#[test]
fn partition_count_does_not_change_result() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let a = write_file(&dir, "a.csv", &(0..40).map(row).collect::<Vec<_>>());
    let b = write_file(&dir, "b.csv", &(40..90).map(row).collect::<Vec<_>>());
    let format = RecordFormat::default();
    let data = read_records(&[a, b], &format).unwrap();
    let q = query();

    let baseline = classify(partitions(&data, 1, &format, 6).unwrap(), &q).unwrap();
    assert_eq!(baseline.stats().accepted, 90);
    assert_eq!(baseline.neighbors().len(), 5);

    for n in [2, 3, 8, 50, 200] {
        let result = classify(partitions(&data, n, &format, 6).unwrap(), &q).unwrap();
        assert_eq!(result.neighbors(), baseline.neighbors(), "{n} partitions");
        assert_eq!(result.label(), baseline.label());
        assert_eq!(result.stats(), baseline.stats());
    }
}

#[test]
fn malformed_rows_are_skipped() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut rows: Vec<String> = (0..10).map(row).collect();
    rows.push(String::new());
    rows.push("1,2,3,x,5,6,sedan".to_string());
    rows.push("1,2,3,sedan".to_string());
    let path = write_file(&dir, "mixed.csv", &rows);

    let format = RecordFormat::default();
    let data = read_records(&[path], &format).unwrap();
    let result = classify(partitions(&data, 3, &format, 6).unwrap(), &query()).unwrap();
    let stats = result.stats();
    assert_eq!(stats.accepted, 10);
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.shape_mismatch, 1);
}

#[test]
fn wrong_feature_count_everywhere_is_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let rows: Vec<String> = (0..5).map(|i| format!("{i},{i},label")).collect();
    let path = write_file(&dir, "narrow.csv", &rows);

    let format = RecordFormat::default();
    let data = read_records(&[path], &format).unwrap();
    let err = classify(partitions(&data, 2, &format, 6).unwrap(), &query()).unwrap_err();
    assert!(matches!(
        err,
        partknn_knn::KnnError::SystemicShapeMismatch { rows: 5, .. }
    ));
}

#[test]
fn streamed_file_matches_in_memory_partition() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_file(&dir, "train.csv", &(0..25).map(row).collect::<Vec<_>>());
    let format = RecordFormat::default();
    let q = query();

    let mut stream = RecordStream::open(&path, &format).unwrap();
    let streamed = rank_partition(PartitionRows::new(stream.by_ref(), &format, 6), &q);
    stream.finish().unwrap();

    let data = read_records(&[&path], &format).unwrap();
    let parts = partitions(&data, 1, &format, 6).unwrap();
    let in_memory = rank_partition(parts.into_iter().next().unwrap(), &q);

    assert_eq!(streamed, in_memory);
    assert_eq!(streamed.stats().accepted, 25);
}
