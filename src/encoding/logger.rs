//! Progress logging with verbosity levels.

use std::time::Instant;

/// Verbosity level for fit/transform progress output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Start/finish summaries.
    Info,
    /// Per-column detail.
    Debug,
}

/// Structured progress logger for encoding passes.
pub(crate) struct EncodingLogger {
    verbosity: Verbosity,
    started: Instant,
}

impl EncodingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: Instant::now(),
        }
    }

    pub fn start_fit(&self, n_columns: usize, n_rows: usize) {
        if self.verbosity >= Verbosity::Info {
            println!("[fit] {n_columns} column(s) over {n_rows} row(s)");
        }
    }

    pub fn log_column(&self, name: &str, n_categories: usize) {
        if self.verbosity >= Verbosity::Debug {
            println!("[fit]   '{name}': {n_categories} categories");
        }
    }

    pub fn finish_fit(&self) {
        if self.verbosity >= Verbosity::Info {
            println!("[fit] done in {:.1?}", self.started.elapsed());
        }
    }

    pub fn start_transform(&self, n_columns: usize, n_rows: usize, holdout: impl std::fmt::Display) {
        if self.verbosity >= Verbosity::Info {
            println!("[transform] {n_columns} column(s) over {n_rows} row(s), holdout={holdout}");
        }
    }

    pub fn finish_transform(&self) {
        if self.verbosity >= Verbosity::Info {
            println!("[transform] done in {:.1?}", self.started.elapsed());
        }
    }
}
