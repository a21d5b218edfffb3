use std::path::PathBuf;

/// Errors raised while building or diffing token documents.
#[derive(Debug, thiserror::Error)]
pub enum TokensError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A token entry in a tokens document could not be keyed.
    #[error("malformed token in {collection}/{group}: {reason}")]
    MalformedToken {
        collection: String,
        group: String,
        reason: String,
    },

    #[error("invalid tokens document: {0}")]
    InvalidDocument(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TokensError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TokensError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TokensError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TokensError>;
