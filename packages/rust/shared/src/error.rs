//! Error types for advisorboard.
//!
//! Library crates use [`AdvisorBoardError`] via `thiserror`.
//! The CLI maps these onto user-facing messages and exit codes, and wraps
//! anything else with `color-eyre`.

use std::path::{Path, PathBuf};

/// Top-level error type for all advisorboard operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorBoardError {
    /// A required input file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Filesystem error while reading an input.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The advisor table could not be decoded.
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Writing the patched document failed.
    #[error("write error at {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AdvisorBoardError>;

impl AdvisorBoardError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a read-side `std::io::Error`, splitting out missing files.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Wrap a write-side `std::io::Error` with a path for context.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// The path of the missing file, if this is a [`AdvisorBoardError::NotFound`].
    pub fn missing_path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = AdvisorBoardError::config("missing [render] section");
        assert_eq!(err.to_string(), "config error: missing [render] section");

        let err = AdvisorBoardError::parse("datos.csv", "invalid UTF-8 in record 3");
        assert!(err.to_string().contains("datos.csv"));
        assert!(err.to_string().contains("record 3"));
    }

    #[test]
    fn read_splits_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AdvisorBoardError::read("datos.csv", io);
        assert_eq!(err.missing_path(), Some(Path::new("datos.csv")));
        assert_eq!(err.to_string(), "file not found: datos.csv");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = AdvisorBoardError::read("datos.csv", io);
        assert!(err.missing_path().is_none());
        assert!(matches!(err, AdvisorBoardError::Io { .. }));
    }
}
