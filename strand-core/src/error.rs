/// Error type shared by every loading, decoding and instantiation path
use std::path::PathBuf;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stream error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("line {line}: expected three coordinates, found \"{content}\"")]
    MalformedLine { line: usize, content: String },

    #[error("segment record is truncated")]
    Truncated,

    #[error("corrupt segment record: {0}")]
    Corrupt(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("primitive factory failed: {0}")]
    Factory(String),
}
