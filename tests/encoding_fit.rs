//! Integration tests for encoder fitting.
//!
//! These tests validate the encoding map produced by `fit` and the
//! fit-time error contract.

use tencode::{
    Dataset, EncodingMap, TargetEncodeError, TargetEncoder, TargetEncoderConfig,
};

// =============================================================================
// Fixtures
// =============================================================================

/// Category "A" (code 0): count=3 sum=2. Category "B" (code 1): count=2 sum=1.
fn train_frame() -> Dataset {
    Dataset::builder()
        .add_categorical("cat", vec![0.0, 0.0, 0.0, 1.0, 1.0])
        .add_numeric("fold", vec![0.0, 0.0, 1.0, 0.0, 1.0])
        .add_numeric("y", vec![1.0, 1.0, 0.0, 0.0, 1.0])
        .build()
        .unwrap()
}

fn fitted_encoder() -> TargetEncoder {
    let config = TargetEncoderConfig::new(vec!["cat".into()], "y".into())
        .with_fold("fold".into())
        .with_threads(1);
    let mut encoder = TargetEncoder::new(config).unwrap();
    encoder.fit(&train_frame()).unwrap();
    encoder
}

// =============================================================================
// Fit Tests
// =============================================================================

#[test]
fn fit_aggregates_counts_and_sums() {
    let encoder = fitted_encoder();
    let map = encoder.encoding_map().unwrap();

    let a = map.category_stats("cat", 0).unwrap();
    assert_eq!((a.count, a.sum), (3, 2.0));
    let b = map.category_stats("cat", 1).unwrap();
    assert_eq!((b.count, b.sum), (2, 1.0));
    assert!(map.category_stats("cat", 5).is_none());
}

#[test]
fn fit_computes_global_prior() {
    let encoder = fitted_encoder();
    let map = encoder.encoding_map().unwrap();

    assert_eq!(map.prior(), 3.0 / 5.0);
}

#[test]
fn fit_records_resolved_columns() {
    let encoder = fitted_encoder();
    let map = encoder.encoding_map().unwrap();

    assert_eq!(map.column_names().collect::<Vec<_>>(), vec!["cat"]);
    assert_eq!(map.response(), "y");
    assert_eq!(map.fold(), Some("fold"));
}

#[test]
fn fit_resolves_positional_selectors() {
    // Same frame addressed by column positions instead of names.
    let config = TargetEncoderConfig::new(vec![0.into()], 2.into()).with_fold(1.into());
    let mut encoder = TargetEncoder::new(config).unwrap();
    let map = encoder.fit(&train_frame()).unwrap();

    assert_eq!(map.column_names().collect::<Vec<_>>(), vec!["cat"]);
    assert_eq!(map.response(), "y");
}

#[test]
fn fit_rejects_non_binary_response() {
    let frame = Dataset::builder()
        .add_categorical("cat", vec![0.0, 1.0, 0.0])
        .add_numeric("y", vec![0.0, 1.0, 2.0])
        .build()
        .unwrap();
    let config = TargetEncoderConfig::new(vec!["cat".into()], "y".into());
    let mut encoder = TargetEncoder::new(config).unwrap();

    let err = encoder.fit(&frame).unwrap_err();
    assert!(matches!(err, TargetEncodeError::InvalidResponse { .. }));
}

#[test]
fn fit_rejects_unknown_columns() {
    let config = TargetEncoderConfig::new(vec!["texture".into()], "y".into());
    let mut encoder = TargetEncoder::new(config).unwrap();

    let err = encoder.fit(&train_frame()).unwrap_err();
    assert!(matches!(err, TargetEncodeError::ColumnNotFound { .. }));
}

#[test]
fn fit_rejects_mixed_selector_styles() {
    let config = TargetEncoderConfig::new(vec!["cat".into(), 1.into()], "y".into());
    assert!(matches!(
        TargetEncoder::new(config),
        Err(TargetEncodeError::InvalidArgument { .. })
    ));
}

// =============================================================================
// Encoding Table Tests
// =============================================================================

#[test]
fn encoding_table_round_trips_through_json() {
    let encoder = fitted_encoder();
    let map = encoder.encoding_map().unwrap();

    let table = map.to_table();
    let json = serde_json::to_string(&table).unwrap();
    let parsed = serde_json::from_str(&json).unwrap();
    let rebuilt = EncodingMap::from_table(&parsed);

    assert_eq!(rebuilt.prior(), map.prior());
    assert_eq!(rebuilt.response(), map.response());
    assert_eq!(rebuilt.fold(), map.fold());
    for code in [0, 1] {
        assert_eq!(
            rebuilt.category_stats("cat", code),
            map.category_stats("cat", code)
        );
    }
}

#[test]
fn encoding_table_is_keyed_by_column_category_fold() {
    let encoder = fitted_encoder();
    let table = encoder.encoding_map().unwrap().to_table();

    // 2 global rows + 4 per-fold rows
    assert_eq!(table.rows.len(), 6);
    assert!(table.rows.iter().all(|r| r.column == "cat"));
    let globals: Vec<_> = table.rows.iter().filter(|r| r.fold.is_none()).collect();
    assert_eq!(globals.len(), 2);
}
