use std::path::PathBuf;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the crate.
///
/// Only configuration-time errors are fatal. Everything that can go wrong per
/// item while augmenting a document (missing members, malformed examples,
/// mismatched metadata) degrades to "no change for that item" and never
/// surfaces here.
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    SourceError { file: PathBuf, message: String },
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SourceError { file, message } => {
                write!(f, "documentation source error {}: {}", file.display(), message)
            }
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SourceError {
            file: PathBuf::from("<unknown>"),
            message: err.to_string(),
        }
    }
}
