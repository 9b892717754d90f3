//! Transform pass: holdout-aware encoded columns.

use crate::data::{Column, ColumnKind, Dataset};
use crate::utils::Parallelism;

use super::blend::blended_estimate;
use super::config::TargetEncoderConfig;
use super::error::TargetEncodeError;
use super::fit::{checked_category_code, read_fold_codes};
use super::holdout::HoldoutType;
use super::logger::EncodingLogger;
use super::map::{CategoryStats, EncodingMap};
use super::noise;

/// Suffix appended to encoded column names.
const ENCODED_SUFFIX: &str = "_te";

// =============================================================================
// TransformParams
// =============================================================================

/// Transform-time options.
///
/// # Example
///
/// ```
/// use tencode::encoding::{HoldoutType, TransformParams};
///
/// // Training frame: out-of-fold encodings with reproducible noise
/// let params = TransformParams {
///     holdout: HoldoutType::KFold,
///     is_training: true,
///     noise: Some(0.01),
///     seed: Some(1234),
///     ..Default::default()
/// };
///
/// // Test frame: whole-frame aggregates, no noise
/// let params = TransformParams::default();
/// assert_eq!(params.holdout, HoldoutType::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    /// Leakage-correction strategy.
    pub holdout: HoldoutType,
    /// Whether the frame is the one the encoder was fitted on. K-fold and
    /// leave-one-out holdouts require this.
    pub is_training: bool,
    /// Half-width of the uniform perturbation added to each estimate.
    /// `None` disables noise.
    pub noise: Option<f64>,
    /// Seed for reproducible noise. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
    /// Retain the raw categorical columns next to their encodings.
    pub keep_source_columns: bool,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            holdout: HoldoutType::None,
            is_training: false,
            noise: None,
            seed: None,
            keep_source_columns: true,
        }
    }
}

// =============================================================================
// Transform pass
// =============================================================================

/// Per-row inputs shared by every encoded column.
struct RowContext<'a> {
    holdout: HoldoutType,
    fold_codes: Option<Vec<i64>>,
    response: Option<&'a [f32]>,
    prior: f64,
    blending: bool,
    inflection_point: f64,
    smoothing: f64,
    noise: Option<(u64, f64)>,
}

/// Encode a frame against a fitted map.
///
/// Produces a new frame with one `<column>_te` numeric column per encoded
/// column, appended after the originals. The input frame is untouched.
pub(crate) fn transform_frame(
    frame: &Dataset,
    map: &EncodingMap,
    config: &TargetEncoderConfig,
    params: &TransformParams,
    parallelism: Parallelism,
) -> Result<Dataset, TargetEncodeError> {
    let logger = EncodingLogger::new(config.verbosity);
    logger.start_transform(map.n_columns(), frame.n_rows(), params.holdout);

    let ctx = build_row_context(frame, map, config, params)?;
    validate_output_columns(frame, map)?;

    let encoded: Vec<Result<Vec<f32>, TargetEncodeError>> =
        parallelism.maybe_par_map(0..map.n_columns(), |col_idx| {
            encode_column(frame, map, &ctx, col_idx)
        });

    let mut columns: Vec<Column> = frame
        .columns()
        .iter()
        .filter(|c| {
            params.keep_source_columns || !map.column_names().any(|name| name == c.name())
        })
        .cloned()
        .collect();
    for ((name, _), values) in map.columns.iter().zip(encoded) {
        columns.push(Column::numeric(format!("{name}{ENCODED_SUFFIX}"), values?));
    }

    let out = Dataset::new(columns).map_err(|e| TargetEncodeError::invalid(e.to_string()))?;
    logger.finish_transform();
    Ok(out)
}

/// Validate holdout requirements and gather the per-row inputs.
fn build_row_context<'a>(
    frame: &'a Dataset,
    map: &EncodingMap,
    config: &TargetEncoderConfig,
    params: &TransformParams,
) -> Result<RowContext<'a>, TargetEncodeError> {
    let noise = match params.noise {
        None => None,
        Some(amount) if amount.is_finite() && amount >= 0.0 => {
            Some((noise::resolve_seed(params.seed), amount))
        }
        Some(amount) => {
            return Err(TargetEncodeError::invalid(format!(
                "noise must be a non-negative finite number, got {amount}"
            )));
        }
    };

    let fold_codes = match params.holdout {
        HoldoutType::KFold => {
            if !params.is_training {
                return Err(TargetEncodeError::invalid(
                    "k-fold holdout only applies to the training frame; \
                     use holdout \"none\" for validation and test frames",
                ));
            }
            let fold = map.fold().ok_or(TargetEncodeError::MissingFoldColumn)?;
            Some(read_fold_codes(frame, fold)?)
        }
        _ => None,
    };

    let response = match params.holdout {
        HoldoutType::LeaveOneOut => {
            if !params.is_training {
                return Err(TargetEncodeError::invalid(
                    "leave-one-out holdout only applies to the training frame; \
                     use holdout \"none\" for validation and test frames",
                ));
            }
            let column = frame
                .column(map.response())
                .ok_or(TargetEncodeError::MissingResponse)?;
            Some(column.values())
        }
        _ => None,
    };

    Ok(RowContext {
        holdout: params.holdout,
        fold_codes,
        response,
        prior: map.prior(),
        blending: config.blending,
        inflection_point: config.inflection_point,
        smoothing: config.smoothing,
        noise,
    })
}

/// The frame must carry every encoded column as categorical, and must not
/// already contain the output names.
fn validate_output_columns(frame: &Dataset, map: &EncodingMap) -> Result<(), TargetEncodeError> {
    for name in map.column_names() {
        match frame.column_kind(name) {
            None => {
                return Err(TargetEncodeError::ColumnNotFound {
                    selector: name.to_string(),
                });
            }
            Some(ColumnKind::Numeric) => {
                return Err(TargetEncodeError::invalid(format!(
                    "column '{name}' is not categorical and cannot be target encoded"
                )));
            }
            Some(ColumnKind::Categorical) => {}
        }
        let output = format!("{name}{ENCODED_SUFFIX}");
        if frame.has_column(&output) {
            return Err(TargetEncodeError::invalid(format!(
                "frame already has a column named '{output}'"
            )));
        }
    }
    Ok(())
}

/// Encode one column for every row of the frame.
fn encode_column(
    frame: &Dataset,
    map: &EncodingMap,
    ctx: &RowContext<'_>,
    col_idx: usize,
) -> Result<Vec<f32>, TargetEncodeError> {
    let (name, stats) = &map.columns[col_idx];
    let values = frame
        .column(name)
        .ok_or_else(|| TargetEncodeError::ColumnNotFound {
            selector: name.clone(),
        })?
        .values();

    let mut out = Vec::with_capacity(values.len());
    for (row, &value) in values.iter().enumerate() {
        let code = checked_category_code(name, row, value)?;
        let global = stats.global_stats(code).copied().unwrap_or_default();

        let effective = match ctx.holdout {
            HoldoutType::None => global,
            HoldoutType::KFold => {
                let folds = ctx.fold_codes.as_deref().expect("kfold context has folds");
                match stats.fold_stats(code, folds[row]) {
                    Some(own_fold) => global.minus(own_fold),
                    None => global,
                }
            }
            HoldoutType::LeaveOneOut => {
                let response = ctx.response.expect("loo context has a response");
                let y = response[row];
                // A row whose response was missing never entered the
                // aggregates, so there is nothing to subtract.
                if y.is_nan() {
                    global
                } else {
                    global.minus(&CategoryStats {
                        count: 1,
                        sum: y as f64,
                    })
                }
            }
        };

        let mut estimate = match effective.mean() {
            None => ctx.prior,
            Some(mean) if ctx.blending => blended_estimate(
                effective.count,
                mean,
                ctx.prior,
                ctx.inflection_point,
                ctx.smoothing,
            ),
            Some(mean) => mean,
        };
        if let Some((seed, amount)) = ctx.noise {
            estimate += noise::cell_noise(seed, col_idx, row, amount);
        }
        out.push(estimate as f32);
    }

    Ok(out)
}
