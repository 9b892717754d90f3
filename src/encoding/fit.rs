//! Fit pass: group-by-reduce aggregation of response totals.

use crate::data::Dataset;
use crate::utils::Parallelism;

use super::config::ResolvedColumns;
use super::error::TargetEncodeError;
use super::logger::{EncodingLogger, Verbosity};
use super::map::{category_code, CategoryStats, ColumnStats, EncodingMap};

/// Build the encoding map for a frame.
///
/// Rows with a missing response are skipped entirely; a missing
/// categorical value is aggregated as its own level. Per-column
/// aggregations are independent and may run in parallel.
pub(crate) fn fit_frame(
    frame: &Dataset,
    resolved: &ResolvedColumns,
    verbosity: Verbosity,
    parallelism: Parallelism,
) -> Result<EncodingMap, TargetEncodeError> {
    let logger = EncodingLogger::new(verbosity);
    logger.start_fit(resolved.columns.len(), frame.n_rows());

    let response = frame
        .column(&resolved.response)
        .ok_or_else(|| TargetEncodeError::ColumnNotFound {
            selector: resolved.response.clone(),
        })?
        .values();
    validate_binary_response(&resolved.response, response)?;

    let fold_codes = match &resolved.fold {
        Some(name) => Some(read_fold_codes(frame, name)?),
        None => None,
    };

    let mut prior = CategoryStats::default();
    for &y in response {
        if !y.is_nan() {
            prior.add(y as f64);
        }
    }

    let aggregated: Vec<Result<(String, ColumnStats), TargetEncodeError>> = parallelism
        .maybe_par_map(&resolved.columns, |name| {
            aggregate_column(frame, name, response, fold_codes.as_deref())
        });

    let mut columns = Vec::with_capacity(aggregated.len());
    for result in aggregated {
        let (name, stats) = result?;
        logger.log_column(&name, stats.n_categories());
        columns.push((name, stats));
    }

    logger.finish_fit();
    Ok(EncodingMap {
        columns,
        prior,
        response: resolved.response.clone(),
        fold: resolved.fold.clone(),
    })
}

/// Aggregate one categorical column: (category, fold) and per-category
/// totals of the response.
fn aggregate_column(
    frame: &Dataset,
    name: &str,
    response: &[f32],
    fold_codes: Option<&[i64]>,
) -> Result<(String, ColumnStats), TargetEncodeError> {
    let values = frame
        .column(name)
        .ok_or_else(|| TargetEncodeError::ColumnNotFound {
            selector: name.to_string(),
        })?
        .values();

    let mut stats = ColumnStats::default();
    for (row, (&value, &y)) in values.iter().zip(response.iter()).enumerate() {
        if y.is_nan() {
            continue;
        }
        let code = checked_category_code(name, row, value)?;
        stats.global.entry(code).or_default().add(y as f64);
        if let Some(folds) = fold_codes {
            stats
                .per_fold
                .entry((code, folds[row]))
                .or_default()
                .add(y as f64);
        }
    }

    Ok((name.to_string(), stats))
}

/// Category code with validation: codes must be non-negative integers
/// (NaN is the missing-value level).
pub(crate) fn checked_category_code(
    column: &str,
    row: usize,
    value: f32,
) -> Result<i64, TargetEncodeError> {
    if !value.is_nan() && (value < 0.0 || value.fract() != 0.0) {
        return Err(TargetEncodeError::invalid(format!(
            "column '{column}' has invalid category code {value} at row {row} \
             (expected a non-negative integer or NaN)"
        )));
    }
    Ok(category_code(value))
}

/// Read fold assignments, failing on any missing value.
pub(crate) fn read_fold_codes(
    frame: &Dataset,
    name: &str,
) -> Result<Vec<i64>, TargetEncodeError> {
    let values = frame
        .column(name)
        .ok_or_else(|| TargetEncodeError::ColumnNotFound {
            selector: name.to_string(),
        })?
        .values();

    values
        .iter()
        .enumerate()
        .map(|(row, &v)| {
            if v.is_nan() {
                Err(TargetEncodeError::MissingFold { row })
            } else {
                Ok(v as i64)
            }
        })
        .collect()
}

/// The response must be 0/1 with both classes observed.
fn validate_binary_response(column: &str, values: &[f32]) -> Result<(), TargetEncodeError> {
    let mut seen_zero = false;
    let mut seen_one = false;
    for (row, &y) in values.iter().enumerate() {
        if y.is_nan() {
            continue;
        }
        if y == 0.0 {
            seen_zero = true;
        } else if y == 1.0 {
            seen_one = true;
        } else {
            return Err(TargetEncodeError::InvalidResponse {
                column: column.to_string(),
                reason: format!("found value {y} at row {row}"),
            });
        }
    }
    match (seen_zero, seen_one) {
        (true, true) => Ok(()),
        (false, false) => Err(TargetEncodeError::InvalidResponse {
            column: column.to_string(),
            reason: "no non-missing values".to_string(),
        }),
        _ => Err(TargetEncodeError::InvalidResponse {
            column: column.to_string(),
            reason: "only one class present".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::config::ResolvedColumns;

    fn resolved(fold: bool) -> ResolvedColumns {
        ResolvedColumns {
            columns: vec!["cat".to_string()],
            response: "y".to_string(),
            fold: fold.then(|| "fold".to_string()),
        }
    }

    fn train_frame() -> Dataset {
        // cat: A A A B B, fold: 0 0 1 0 1, y: 1 0 1 1 0
        Dataset::builder()
            .add_categorical("cat", vec![0.0, 0.0, 0.0, 1.0, 1.0])
            .add_numeric("fold", vec![0.0, 0.0, 1.0, 0.0, 1.0])
            .add_numeric("y", vec![1.0, 0.0, 1.0, 1.0, 0.0])
            .build()
            .unwrap()
    }

    #[test]
    fn fit_builds_global_aggregates_and_prior() {
        let map = fit_frame(
            &train_frame(),
            &resolved(false),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap();

        assert_eq!(map.prior(), 3.0 / 5.0);
        assert_eq!(
            map.category_stats("cat", 0),
            Some(CategoryStats { count: 3, sum: 2.0 })
        );
        assert_eq!(
            map.category_stats("cat", 1),
            Some(CategoryStats { count: 2, sum: 1.0 })
        );
        assert!(map.fold().is_none());
        assert!(map.column_stats("cat").unwrap().per_fold.is_empty());
    }

    #[test]
    fn fit_builds_per_fold_aggregates() {
        let map = fit_frame(
            &train_frame(),
            &resolved(true),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap();

        let stats = map.column_stats("cat").unwrap();
        assert_eq!(
            stats.fold_stats(0, 0),
            Some(&CategoryStats { count: 2, sum: 1.0 })
        );
        assert_eq!(
            stats.fold_stats(0, 1),
            Some(&CategoryStats { count: 1, sum: 1.0 })
        );
        assert_eq!(
            stats.fold_stats(1, 0),
            Some(&CategoryStats { count: 1, sum: 1.0 })
        );
        assert_eq!(
            stats.fold_stats(1, 1),
            Some(&CategoryStats { count: 1, sum: 0.0 })
        );
    }

    #[test]
    fn fit_skips_missing_response_rows() {
        let frame = Dataset::builder()
            .add_categorical("cat", vec![0.0, 0.0, 1.0])
            .add_numeric("y", vec![1.0, f32::NAN, 0.0])
            .build()
            .unwrap();
        let map = fit_frame(
            &frame,
            &resolved(false),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap();

        assert_eq!(map.prior, CategoryStats { count: 2, sum: 1.0 });
        assert_eq!(
            map.category_stats("cat", 0),
            Some(CategoryStats { count: 1, sum: 1.0 })
        );
    }

    #[test]
    fn fit_treats_missing_category_as_level() {
        let frame = Dataset::builder()
            .add_categorical("cat", vec![0.0, f32::NAN, f32::NAN])
            .add_numeric("y", vec![0.0, 1.0, 1.0])
            .build()
            .unwrap();
        let map = fit_frame(
            &frame,
            &resolved(false),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap();

        assert_eq!(
            map.category_stats("cat", crate::encoding::NA_CATEGORY),
            Some(CategoryStats { count: 2, sum: 2.0 })
        );
    }

    #[test]
    fn fit_rejects_non_binary_response() {
        let frame = Dataset::builder()
            .add_categorical("cat", vec![0.0, 1.0])
            .add_numeric("y", vec![0.0, 2.0])
            .build()
            .unwrap();
        let err = fit_frame(
            &frame,
            &resolved(false),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, TargetEncodeError::InvalidResponse { .. }));
    }

    #[test]
    fn fit_rejects_single_class_response() {
        let frame = Dataset::builder()
            .add_categorical("cat", vec![0.0, 1.0])
            .add_numeric("y", vec![1.0, 1.0])
            .build()
            .unwrap();
        let err = fit_frame(
            &frame,
            &resolved(false),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, TargetEncodeError::InvalidResponse { .. }));
    }

    #[test]
    fn fit_rejects_missing_fold_values() {
        let frame = Dataset::builder()
            .add_categorical("cat", vec![0.0, 1.0])
            .add_numeric("fold", vec![0.0, f32::NAN])
            .add_numeric("y", vec![0.0, 1.0])
            .build()
            .unwrap();
        let err = fit_frame(
            &frame,
            &resolved(true),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, TargetEncodeError::MissingFold { row: 1 }));
    }

    #[test]
    fn fit_rejects_negative_category_codes() {
        let frame = Dataset::builder()
            .add_categorical("cat", vec![0.0, -2.0])
            .add_numeric("y", vec![0.0, 1.0])
            .build()
            .unwrap();
        let err = fit_frame(
            &frame,
            &resolved(false),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap_err();
        assert!(matches!(err, TargetEncodeError::InvalidArgument { .. }));
    }

    #[test]
    fn fit_parallel_matches_sequential() {
        let frame = train_frame();
        let seq = fit_frame(
            &frame,
            &resolved(true),
            Verbosity::Silent,
            Parallelism::Sequential,
        )
        .unwrap();
        let par = fit_frame(
            &frame,
            &resolved(true),
            Verbosity::Silent,
            Parallelism::Parallel,
        )
        .unwrap();

        assert_eq!(seq.prior, par.prior);
        assert_eq!(
            seq.column_stats("cat").unwrap().global,
            par.column_stats("cat").unwrap().global
        );
        assert_eq!(
            seq.column_stats("cat").unwrap().per_fold,
            par.column_stats("cat").unwrap().per_fold
        );
    }
}
