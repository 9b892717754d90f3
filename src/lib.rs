//! tencode: target encoding for categorical features in Rust.
//!
//! Target encoding replaces a categorical column with the per-category mean
//! of a binary response, estimated with leakage-aware holdouts and optional
//! blending toward the global prior.
//!
//! # Key Types
//!
//! - [`TargetEncoder`] - High-level encoder with fit/transform
//! - [`TargetEncoderConfig`] - Encoder configuration
//! - [`EncodingMap`] - Fitted per-category statistics
//! - [`TransformParams`] / [`HoldoutType`] - Transform-time options
//! - [`Dataset`] - Data handling
//!
//! # Fitting and transforming
//!
//! Use `TargetEncoderConfig::new()` to configure, `TargetEncoder::fit()` to
//! build the encoding map, then `transform()` (or `transform_with()` for an
//! explicit map) to produce encoded frames. See the [`encoding`] module for
//! details.

// Re-export approx traits for users who want to compare encoded columns
pub use approx;

pub mod data;
pub mod encoding;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level encoder types (most users want these)
pub use encoding::{
    ColumnSelector, EncodingMap, EncodingRow, EncodingTable, HoldoutType, TargetEncodeError,
    TargetEncoder, TargetEncoderConfig, TransformParams, Verbosity,
};

// Data types (for preparing frames)
pub use data::{Column, Dataset, DatasetBuilder, DatasetError};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
