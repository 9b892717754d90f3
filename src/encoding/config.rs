//! Encoder configuration.
//!
//! [`TargetEncoderConfig`] carries everything fixed at construction time:
//! which columns to encode, the response and optional fold columns,
//! blending parameters, and threading. Transform-time options live in
//! [`TransformParams`](super::TransformParams).

use std::fmt;

use crate::data::{ColumnKind, Dataset};

use super::error::TargetEncodeError;
use super::logger::Verbosity;

// =============================================================================
// ColumnSelector
// =============================================================================

/// A column reference: by name or by position.
///
/// Selectors are resolved to names once, against the fit frame. A list
/// mixing names and positions is rejected rather than partially coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Reference by column name.
    Name(String),
    /// Reference by zero-based column position.
    Index(usize),
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        ColumnSelector::Name(name.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        ColumnSelector::Name(name)
    }
}

impl From<usize> for ColumnSelector {
    fn from(index: usize) -> Self {
        ColumnSelector::Index(index)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Name(name) => write!(f, "{name}"),
            ColumnSelector::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl ColumnSelector {
    fn is_name(&self) -> bool {
        matches!(self, ColumnSelector::Name(_))
    }

    /// Resolve to a column name against a frame.
    fn resolve(&self, frame: &Dataset) -> Result<String, TargetEncodeError> {
        match self {
            ColumnSelector::Name(name) => {
                if frame.has_column(name) {
                    Ok(name.clone())
                } else {
                    Err(TargetEncodeError::ColumnNotFound {
                        selector: name.clone(),
                    })
                }
            }
            ColumnSelector::Index(index) => frame
                .columns()
                .get(*index)
                .map(|c| c.name().to_string())
                .ok_or_else(|| TargetEncodeError::ColumnNotFound {
                    selector: self.to_string(),
                }),
        }
    }
}

// =============================================================================
// TargetEncoderConfig
// =============================================================================

/// Target encoder configuration.
///
/// # Example
///
/// ```
/// use tencode::encoding::TargetEncoderConfig;
///
/// let config = TargetEncoderConfig::new(vec!["color".into()], "label".into())
///     .with_fold("fold".into())
///     .with_blending(true)
///     .with_inflection_point(5.0)
///     .with_smoothing(2.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TargetEncoderConfig {
    /// Categorical columns to encode, in output order.
    pub columns: Vec<ColumnSelector>,
    /// Binary 0/1 response column.
    pub response: ColumnSelector,
    /// Fold assignment column, required for k-fold holdout.
    pub fold: Option<ColumnSelector>,
    /// Blend per-category estimates toward the global prior.
    pub blending: bool,
    /// Sample count at which the blending weight is exactly 0.5. Must be > 0.
    pub inflection_point: f64,
    /// Rate of transition between posterior and prior. Must be > 0.
    pub smoothing: f64,
    /// Thread count: 0 = auto, 1 = sequential, n = exactly n threads.
    pub n_threads: usize,
    /// Verbosity level for fit/transform progress output.
    pub verbosity: Verbosity,
}

impl TargetEncoderConfig {
    /// Create a configuration with default blending parameters
    /// (blending on, inflection point 3, smoothing 1).
    pub fn new(columns: Vec<ColumnSelector>, response: ColumnSelector) -> Self {
        Self {
            columns,
            response,
            fold: None,
            blending: true,
            inflection_point: 3.0,
            smoothing: 1.0,
            n_threads: 0,
            verbosity: Verbosity::default(),
        }
    }

    /// Set the fold column.
    pub fn with_fold(mut self, fold: ColumnSelector) -> Self {
        self.fold = Some(fold);
        self
    }

    /// Enable or disable blending.
    pub fn with_blending(mut self, blending: bool) -> Self {
        self.blending = blending;
        self
    }

    /// Set the blending inflection point.
    pub fn with_inflection_point(mut self, inflection_point: f64) -> Self {
        self.inflection_point = inflection_point;
        self
    }

    /// Set the blending smoothing rate.
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the thread count (0 = auto, 1 = sequential).
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Set the verbosity level.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Validate frame-independent invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TargetEncodeError::InvalidArgument`] if the column list
    /// is empty, mixes names and positions, or a blending parameter is
    /// not a positive finite number.
    pub fn validate(&self) -> Result<(), TargetEncodeError> {
        if self.columns.is_empty() {
            return Err(TargetEncodeError::invalid(
                "at least one column to encode is required",
            ));
        }

        let mut selectors: Vec<&ColumnSelector> = self.columns.iter().collect();
        selectors.push(&self.response);
        if let Some(fold) = &self.fold {
            selectors.push(fold);
        }
        let n_names = selectors.iter().filter(|s| s.is_name()).count();
        if n_names != 0 && n_names != selectors.len() {
            return Err(TargetEncodeError::invalid(
                "column selectors mix names and positions; use one or the other",
            ));
        }

        if !(self.inflection_point.is_finite() && self.inflection_point > 0.0) {
            return Err(TargetEncodeError::invalid(format!(
                "inflection_point must be a positive finite number, got {}",
                self.inflection_point
            )));
        }
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(TargetEncodeError::invalid(format!(
                "smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }

        Ok(())
    }

    /// Resolve all selectors to names against a frame and check the
    /// resolved columns are usable.
    pub(crate) fn resolve(&self, frame: &Dataset) -> Result<ResolvedColumns, TargetEncodeError> {
        self.validate()?;

        let mut columns = Vec::with_capacity(self.columns.len());
        for selector in &self.columns {
            let name = selector.resolve(frame)?;
            if columns.contains(&name) {
                return Err(TargetEncodeError::invalid(format!(
                    "column '{name}' listed more than once"
                )));
            }
            if frame.column_kind(&name) != Some(ColumnKind::Categorical) {
                return Err(TargetEncodeError::invalid(format!(
                    "column '{name}' is not categorical and cannot be target encoded"
                )));
            }
            columns.push(name);
        }

        let response = self.response.resolve(frame)?;
        let fold = self.fold.as_ref().map(|f| f.resolve(frame)).transpose()?;

        if columns.contains(&response) {
            return Err(TargetEncodeError::invalid(format!(
                "response column '{response}' cannot also be encoded"
            )));
        }
        if let Some(fold) = &fold {
            if columns.contains(fold) || fold == &response {
                return Err(TargetEncodeError::invalid(format!(
                    "fold column '{fold}' must be disjoint from encoded and response columns"
                )));
            }
        }

        Ok(ResolvedColumns {
            columns,
            response,
            fold,
        })
    }
}

/// Column selectors resolved to names against a concrete frame.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedColumns {
    pub columns: Vec<String>,
    pub response: String,
    pub fold: Option<String>,
}
