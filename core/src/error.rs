use std::path::PathBuf;
use thiserror::Error;

/// Result type for dicomsort operations
pub type Result<T> = std::result::Result<T, SortError>;

/// Error types for dicomsort operations
#[derive(Error, Debug)]
pub enum SortError {
    /// Configuration error (bad arguments, missing policy file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Metadata dump tool is not installed or not executable
    #[error("dump tool not available: {0}")]
    ToolMissing(String),

    /// Dump tool exited with a non-zero status for one file
    #[error("metadata dump failed for {path}: {detail}")]
    DumpFailed { path: PathBuf, detail: String },

    /// Run lock could not be opened or created
    #[error("lock error: {0}")]
    Lock(String),

    /// Placement failed for one file (directory creation, name exhaustion)
    #[error("placement error: {0}")]
    Placement(String),

    /// Moving a file into its destination failed; fatal for the run
    #[error("failed to move {from} to {to}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for SortError {
    fn from(s: String) -> Self {
        SortError::Placement(s)
    }
}

impl From<&str> for SortError {
    fn from(s: &str) -> Self {
        SortError::Placement(s.to_string())
    }
}

impl SortError {
    /// Whether this error aborts the whole run rather than a single file
    ///
    /// Move failures signal a structural problem (cross-device destination,
    /// permission misconfiguration) that every remaining file would hit too.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SortError::MoveFailed { .. }
                | SortError::Config(_)
                | SortError::Lock(_)
                | SortError::ToolMissing(_)
        )
    }
}
