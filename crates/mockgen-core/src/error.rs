//! Error types and error code constants for mockgen.
//!
//! `MockGenError` is the single error type surfaced to callers and the CLI.
//! Template failures start out as [`TemplateError`] and are bridged in with
//! `From`.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments or malformed input documents
//! - `3`: Input file not found
//! - `4`: Template rendering failed
//! - `10`: Internal errors, including declaration contract violations

use std::fmt;

use thiserror::Error;

use crate::template::TemplateError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output and CLI exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or malformed input.
    InvalidArguments = 2,
    /// Input file not found.
    FileNotFound = 3,
    /// Template rendering failed.
    RenderError = 4,
    /// Internal errors (bugs, broken input contracts).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for model building, rendering and the CLI.
#[derive(Debug, Error)]
pub enum MockGenError {
    /// The labels in a declaration's name disagree with its parameter list.
    #[error(
        "declaration '{name}' at offset {offset} has {labels} argument label(s) but {params} parameter(s)"
    )]
    InputContractViolation {
        name: String,
        offset: u64,
        labels: usize,
        params: usize,
    },

    /// Template substitution failed.
    #[error("failed to render {template} template: {message}")]
    TemplateRenderFailure { template: String, message: String },

    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input document could not be decoded.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

/// Result type alias for mockgen operations.
pub type MockGenResult<T> = Result<T, MockGenError>;

impl From<&MockGenError> for OutputErrorCode {
    fn from(err: &MockGenError) -> Self {
        match err {
            MockGenError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            MockGenError::InvalidInput { .. } => OutputErrorCode::InvalidArguments,
            MockGenError::FileNotFound { .. } => OutputErrorCode::FileNotFound,
            MockGenError::TemplateRenderFailure { .. } => OutputErrorCode::RenderError,
            MockGenError::InputContractViolation { .. } => OutputErrorCode::InternalError,
            MockGenError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<MockGenError> for OutputErrorCode {
    fn from(err: MockGenError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<TemplateError> for MockGenError {
    fn from(err: TemplateError) -> Self {
        MockGenError::TemplateRenderFailure {
            template: err.template().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MockGenError {
    fn from(err: serde_json::Error) -> Self {
        MockGenError::InvalidInput {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl MockGenError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        MockGenError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        MockGenError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        MockGenError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}
