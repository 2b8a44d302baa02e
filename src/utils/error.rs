use thiserror::Error;

/// Main error type for dynapart
#[derive(Debug, Error)]
pub enum DynapartError {
    #[error("{0}")]
    Argument(#[from] ArgumentError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl DynapartError {
    /// True when the reader of an output stream went away
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, DynapartError::Output(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

/// Errors raised while turning CLI literals into statement parameters
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("invalid arg '{literal}' #{index}: {reason}")]
    InvalidJson {
        index: usize,
        literal: String,
        reason: String,
    },
}

/// Attribute values that cannot be rendered as JSON
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("invalid number attribute: {0}")]
    InvalidNumber(String),

    #[error("unsupported attribute type: {0}")]
    UnsupportedAttribute(String),

    #[error("could not serialize item: {0}")]
    Serialize(String),
}

/// Remote store failures, surfaced verbatim
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ExecuteStatement failed: {0}")]
    ExecuteStatement(String),

    #[error("ListTables failed: {0}")]
    ListTables(String),
}

/// Result type alias for dynapart operations
pub type DynapartResult<T> = Result<T, DynapartError>;
