//! Error types for partitioning operations

use thiserror::Error;

/// Errors raised while counting or partitioning a corpus file
#[derive(Debug, Error)]
pub enum PartitionError {
    /// Source file missing, unreadable, or a read failure mid-stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-positive part count or granularity, empty delimiter, fold out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed configuration document
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PartitionError {
    fn from(error: serde_json::Error) -> Self {
        PartitionError::Config(error.to_string())
    }
}

impl PartitionError {
    /// Shorthand for building an [`PartitionError::InvalidArgument`]
    pub fn invalid(message: impl Into<String>) -> Self {
        PartitionError::InvalidArgument(message.into())
    }

    /// True when the error came from the filesystem rather than the caller's arguments
    pub fn is_io(&self) -> bool {
        matches!(self, PartitionError::Io(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PartitionError>;

/// Reject a part count of zero before any file is touched.
pub(crate) fn ensure_parts(parts: usize) -> Result<()> {
    if parts == 0 {
        return Err(PartitionError::invalid("parts must be at least 1"));
    }
    Ok(())
}

/// Reject a granularity of zero before any file is touched.
pub(crate) fn ensure_granularity(granularity: usize) -> Result<()> {
    if granularity == 0 {
        return Err(PartitionError::invalid("granularity must be at least 1"));
    }
    Ok(())
}

/// Reject an empty delimiter; splitting on nothing has no meaning.
pub(crate) fn ensure_delimiter(delimiter: &str) -> Result<()> {
    if delimiter.is_empty() {
        return Err(PartitionError::invalid("delimiter must not be empty"));
    }
    Ok(())
}

/// Reject a fold that does not name one of the `parts` parts.
pub(crate) fn ensure_fold(parts: usize, fold: usize) -> Result<()> {
    if fold == 0 || fold > parts {
        return Err(PartitionError::invalid(format!(
            "fold {} is outside 1..={}",
            fold, parts
        )));
    }
    Ok(())
}
