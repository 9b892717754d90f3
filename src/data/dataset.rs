//! Dataset container and builder.
//!
//! This is the canonical entry point for the encoding APIs.

use super::column::{Column, ColumnKind};

/// Dataset construction/validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset has no columns")]
    EmptyFrame,

    #[error("inconsistent number of rows: column '{column}' expected {expected}, got {got}")]
    InconsistentRows {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column name '{name}'")]
    DuplicateName { name: String },
}

/// An ordered collection of equally long, named columns.
///
/// Immutable once constructed. The encoder never mutates a frame in
/// place; `transform` returns a new [`Dataset`].
///
/// # Example
///
/// ```
/// use tencode::data::Dataset;
///
/// let ds = Dataset::builder()
///     .add_categorical("color", vec![0.0, 1.0, 0.0])
///     .add_numeric("label", vec![1.0, 0.0, 1.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.n_rows(), 3);
/// assert_eq!(ds.n_columns(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Create a dataset from columns.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if no columns are given, column lengths
    /// disagree, or two columns share a name.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let first = columns.first().ok_or(DatasetError::EmptyFrame)?;
        let n_rows = first.len();

        for col in &columns {
            if col.len() != n_rows {
                return Err(DatasetError::InconsistentRows {
                    column: col.name().to_string(),
                    expected: n_rows,
                    got: col.len(),
                });
            }
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(DatasetError::DuplicateName {
                    name: col.name().to_string(),
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Create a builder for incremental construction.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns, in frame order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names, in frame order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Returns true if a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Kind of the named column, if present.
    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(|c| c.kind())
    }
}

/// Builder for incremental dataset construction.
///
/// # Example
///
/// ```
/// use tencode::data::DatasetBuilder;
///
/// let ds = DatasetBuilder::default()
///     .add_categorical("color", vec![0.0, 1.0, 2.0])
///     .add_numeric("label", vec![0.0, 1.0, 0.0])
///     .build()
///     .unwrap();
/// assert_eq!(ds.n_columns(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<Column>,
}

impl DatasetBuilder {
    /// Add a numeric column.
    pub fn add_numeric(mut self, name: &str, values: Vec<f32>) -> Self {
        self.columns.push(Column::numeric(name, values));
        self
    }

    /// Add a categorical column.
    ///
    /// Values should be non-negative integer category codes encoded as
    /// floats (e.g. `0.0`, `1.0`, `2.0`), with `f32::NAN` for missing.
    pub fn add_categorical(mut self, name: &str, values: Vec<f32>) -> Self {
        self.columns.push(Column::categorical(name, values));
        self
    }

    /// Add an already-built column.
    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Build the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] under the same conditions as
    /// [`Dataset::new`].
    pub fn build(self) -> Result<Dataset, DatasetError> {
        Dataset::new(self.columns)
    }
}
