//! Error types for the codemod engine.
//!
//! Query misses and mutations without a target are not errors: they produce
//! empty results or leave the file unchanged. Errors are reserved for input
//! that cannot be turned into a tree at all.

use gocodemod_cst::ParserError;
use thiserror::Error;

/// Errors raised while building or editing a [`SourceFile`](crate::SourceFile).
#[derive(Debug, Error)]
pub enum CodemodError {
    /// The source text is not a valid Go file.
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),

    /// The text given as a map type does not describe a map type.
    #[error("invalid map type '{text}': {reason}")]
    InvalidMapType { text: String, reason: String },

    /// A snippet could not be parsed as a statement, expression or declaration.
    #[error("invalid fragment '{text}': {reason}")]
    InvalidFragment { text: String, reason: String },
}

impl CodemodError {
    pub(crate) fn invalid_fragment(text: &str, reason: impl Into<String>) -> Self {
        CodemodError::InvalidFragment {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for engine operations.
pub type CodemodResult<T> = Result<T, CodemodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CodemodError::InvalidMapType {
            text: "[]int".to_string(),
            reason: "not a map type".to_string(),
        };
        assert_eq!(err.to_string(), "invalid map type '[]int': not a map type");

        let err = CodemodError::invalid_fragment("x :=", "unexpected end of input");
        assert!(err.to_string().starts_with("invalid fragment 'x :='"));
    }

    #[test]
    fn test_parse_error_converts() {
        let parse_err = gocodemod_cst::parse_file("func main() {}").unwrap_err();
        let err: CodemodError = parse_err.into();
        assert!(matches!(err, CodemodError::Parse(_)));
        assert!(err.to_string().starts_with("parse error: "));
    }
}
