//! Error types shared across the crate.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error is every fatal condition a comparison can hit.
///
/// Certificate decode failures and rename ties never show up here: they are
/// recovered inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load {location}: {source}")]
    Load {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{location}: path {path} not found")]
    PathNotFound { path: String, location: String },

    #[error("{location}: cannot turn {path} into documents, it is not a list")]
    ChrootNotSequence { path: String, location: String },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid regular expression {pattern:?}: {source}")]
    RegexCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    pub fn load(location: impl Into<String>, source: std::io::Error) -> Self {
        Error::Load {
            location: location.into(),
            source,
        }
    }

    pub fn path_not_found(path: impl Into<String>, location: impl Into<String>) -> Self {
        Error::PathNotFound {
            path: path.into(),
            location: location.into(),
        }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// ParseError describes malformed YAML input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Source path or URL of the input.
    pub location: String,
    /// 1-based line, when the parser reported one.
    pub line: Option<usize>,
    /// 1-based column, when the parser reported one.
    pub column: Option<usize>,
    pub message: String,
}

impl ParseError {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError {
            location: location.into(),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Builds a ParseError from a YAML scanner error, keeping its position.
    pub fn from_scan(location: impl Into<String>, err: &yaml_rust2::scanner::ScanError) -> Self {
        let mark = err.marker();
        ParseError {
            location: location.into(),
            line: Some(mark.line()),
            column: Some(mark.col() + 1),
            message: err.info().to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "failed to parse {} at line {} column {}: {}",
                self.location, line, column, self.message
            ),
            _ => write!(f, "failed to parse {}: {}", self.location, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let mut err = ParseError::new("a.yaml", "did not find expected key");
        assert_eq!(err.to_string(), "failed to parse a.yaml: did not find expected key");

        err.line = Some(3);
        err.column = Some(5);
        assert!(err.to_string().contains("line 3 column 5"));
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = Error::path_not_found("spec.template", "deploy.yaml");
        assert_eq!(err.to_string(), "deploy.yaml: path spec.template not found");

        let err = Error::from(ParseError::new("b.yaml", "bad"));
        assert!(matches!(err, Error::Parse(_)));
    }
}
