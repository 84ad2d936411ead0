//! Error types for applying codemods to a directory.
//!
//! Every error names the file it happened in, so a failed run can be
//! resumed after fixing that file or the codemod that tripped on it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use gocodemod_engine::CodemodError;

/// Errors raised by [`apply_to_directory`](crate::apply_to_directory) and
/// config loading.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Reading, writing or walking a path failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A replacement pattern is not a valid regular expression.
    #[error("invalid replacement pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A Go file could not be parsed.
    #[error("{}: {source}", path.display())]
    Codemod {
        path: PathBuf,
        #[source]
        source: CodemodError,
    },

    /// A codemod panicked, for instance on a missing struct literal field.
    #[error("codemod '{description}' panicked on {}: {message}", path.display())]
    CodemodPanicked {
        path: PathBuf,
        description: String,
        message: String,
    },

    /// The config file is not valid JSON for [`ApplyConfig`](crate::ApplyConfig).
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl ApplyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ApplyError::Io {
            path: path.into(),
            source,
        }
    }

    /// The file the error is about, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ApplyError::Io { path, .. }
            | ApplyError::Codemod { path, .. }
            | ApplyError::CodemodPanicked { path, .. } => Some(path),
            ApplyError::Regex { .. } | ApplyError::Config(_) => None,
        }
    }
}

/// Result alias for directory application.
pub type ApplyResult<T> = Result<T, ApplyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = ApplyError::io("src/a.go", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "I/O error at src/a.go: gone");
        assert_eq!(err.path(), Some(&PathBuf::from("src/a.go")));

        let err = ApplyError::CodemodPanicked {
            path: PathBuf::from("main.go"),
            description: "rename key".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "codemod 'rename key' panicked on main.go: boom");
    }

    #[test]
    fn test_regex_error() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = ApplyError::Regex {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid replacement pattern '('"));
        assert!(err.path().is_none());
    }

    #[test]
    fn test_config_error_converts() {
        let err: ApplyError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ApplyError::Config(_)));
    }
}
