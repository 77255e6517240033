use thiserror::Error;

/// Central error type for the stem-extractor crate.
///
/// Each variant is one failure category of the pipeline, so callers can
/// discriminate without matching on message text. `Display` carries the
/// exact string that ends up in the `error` field of the result line.
#[derive(Debug, Error)]
pub enum ExtractError {
    // Bad or missing caller input (argument, nonexistent file)
    #[error("{0}")]
    Input(String),

    // Downloader failed or produced nothing usable
    #[error("{0}")]
    Acquisition(String),

    // Separation subprocess failed or its output is missing
    #[error("{0}")]
    Separation(String),

    // Moving stems into their destination folders failed
    #[error("{0}")]
    Placement(String),

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("cancelled")]
    Cancelled,

    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Unexpected(#[from] anyhow::Error),
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Unexpected(e.into())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        ExtractError::Unexpected(e.into())
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
