//! Encoding errors.

/// Errors raised by [`TargetEncoder`](super::TargetEncoder) fit and
/// transform.
///
/// All errors are raised synchronously at the point of detection; fit and
/// transform either fully succeed or fail without partial results.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetEncodeError {
    /// The response column is not a usable binary 0/1 target at fit time.
    #[error("response column '{column}' is not a binary 0/1 target: {reason}")]
    InvalidResponse { column: String, reason: String },

    /// A parameter or column reference is unusable.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A configured column does not resolve against the frame.
    #[error("column '{selector}' not found in frame")]
    ColumnNotFound { selector: String },

    /// K-fold holdout was requested but no fold column is available.
    #[error("k-fold holdout requires a fold column, but none was fitted")]
    MissingFoldColumn,

    /// K-fold holdout was requested but a row carries no fold assignment.
    #[error("row {row} has no fold assignment but k-fold holdout was requested")]
    MissingFold { row: usize },

    /// Leave-one-out holdout was requested on a frame without the
    /// response column.
    #[error("leave-one-out holdout requires the response column on the frame")]
    MissingResponse,

    /// `transform` was called on an encoder that has not been fitted.
    #[error("transform called before fit")]
    Unfitted,
}

impl TargetEncodeError {
    /// Shorthand for [`TargetEncodeError::InvalidArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TargetEncodeError::InvalidArgument {
            message: message.into(),
        }
    }
}
