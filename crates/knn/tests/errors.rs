//! Integration tests for KnnError variants.

use partknn_knn::{
    BoundedTopK, Candidate, KnnConfig, KnnError, LabeledSample, Merger, PartitionOutput,
    PartitionStats, QueryPoint, RowError, classify, majority_vote, merge, sq_euclidean,
};

fn query_1d(k: usize) -> QueryPoint {
    QueryPoint::new(vec![0.0], &KnnConfig::new(k).with_n_features(1)).unwrap()
}

#[test]
fn error_invalid_k_query() {
    let config = KnnConfig::new(0).with_n_features(1);
    let result = QueryPoint::new(vec![0.0], &config);
    assert!(matches!(result, Err(KnnError::InvalidK { k: 0 })));
}

#[test]
fn error_invalid_k_topk() {
    assert!(matches!(
        BoundedTopK::new(0),
        Err(KnnError::InvalidK { k: 0 })
    ));
}

#[test]
fn error_invalid_k_merger() {
    assert!(matches!(
        Merger::new(0, 1),
        Err(KnnError::InvalidK { k: 0 })
    ));
}

#[test]
fn error_invalid_feature_count() {
    let config = KnnConfig::new(1).with_n_features(0);
    let result = QueryPoint::new(Vec::new(), &config);
    assert!(matches!(
        result,
        Err(KnnError::InvalidFeatureCount { n_features: 0 })
    ));
}

#[test]
fn error_query_dimension_mismatch() {
    // default n_features is 6
    let config = KnnConfig::new(3);
    let result = QueryPoint::new(vec![0.0; 5], &config);
    assert!(matches!(
        result,
        Err(KnnError::QueryDimensionMismatch {
            query: 5,
            n_features: 6
        })
    ));
}

#[test]
fn error_nan_in_query() {
    let config = KnnConfig::new(1).with_n_features(2);
    let result = QueryPoint::new(vec![0.0, f64::NAN], &config);
    assert!(matches!(
        result,
        Err(KnnError::NonFiniteInput { input: "query" })
    ));
}

#[test]
fn error_distance_length_mismatch() {
    assert!(matches!(
        sq_euclidean(&[1.0, 2.0, 3.0], &[1.0]),
        Err(KnnError::DimensionMismatch { left: 3, right: 1 })
    ));
}

#[test]
fn error_systemic_shape_mismatch() {
    let q = query_1d(2);
    let partitions = vec![
        vec![Err(RowError::FieldCount {
            expected: 2,
            got: 7,
        })],
        vec![Ok(LabeledSample::new(vec![1.0; 6], "six"))],
    ];
    assert!(matches!(
        classify(partitions, &q),
        Err(KnnError::SystemicShapeMismatch {
            rows: 2,
            n_features: 1
        })
    ));
}

#[test]
fn malformed_rows_only_is_no_votes() {
    let q = query_1d(2);
    let partitions = vec![vec![
        Err(RowError::EmptyLabel),
        Err(RowError::InvalidNumber {
            column: 0,
            value: "x".to_string(),
        }),
    ]];
    assert!(matches!(classify(partitions, &q), Err(KnnError::NoVotes)));
}

#[test]
fn error_no_votes() {
    assert!(matches!(
        majority_vote(Vec::<&str>::new()),
        Err(KnnError::NoVotes)
    ));
}

#[test]
fn error_incomplete_merge() {
    let merger = Merger::new(3, 2).unwrap();
    assert!(matches!(
        merger.finish(),
        Err(KnnError::IncompleteMerge {
            expected: 2,
            received: 0
        })
    ));
}

#[test]
fn error_too_many_partitions_for_barrier() {
    let mut merger = Merger::new(1, 1).unwrap();
    for _ in 0..2 {
        merger
            .accept(PartitionOutput::new(1, Vec::new(), PartitionStats::default()))
            .unwrap();
    }
    assert!(matches!(
        merger.finish(),
        Err(KnnError::IncompleteMerge {
            expected: 1,
            received: 2
        })
    ));
}

#[test]
fn error_k_mismatch() {
    let mut merger = Merger::new(3, 1).unwrap();
    let output = PartitionOutput::new(4, Vec::new(), PartitionStats::default());
    assert!(matches!(
        merger.accept(output),
        Err(KnnError::KMismatch {
            expected: 3,
            got: 4
        })
    ));
}

#[test]
fn error_infinite_candidate() {
    let set = vec![Candidate::new(f64::INFINITY, "x")];
    assert!(matches!(
        merge(2, [set]),
        Err(KnnError::NonFiniteInput {
            input: "candidate distance"
        })
    ));
}
