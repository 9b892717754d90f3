//! Data input abstractions for encoding.
//!
//! This module provides the [`Dataset`] container used by the encoder:
//! an ordered collection of equally long, named columns.
//!
//! # Storage
//!
//! All values are stored as `f32`. Categorical columns carry non-negative
//! integer category codes encoded as floats (e.g. `0.0`, `1.0`, `2.0`).
//!
//! # Missing Values
//!
//! Missing values are represented as `f32::NAN`, for numeric and
//! categorical columns alike.

mod column;
mod dataset;

pub use column::{Column, ColumnKind};
pub use dataset::{Dataset, DatasetBuilder, DatasetError};
