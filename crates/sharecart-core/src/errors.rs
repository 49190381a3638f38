use std::fmt;
use std::io;
use std::path::PathBuf;

/// Kind of value a token failed to parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// Malformed file content. Only produced by the strict reader.
///
/// `line` is the 1-based line of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("line {line}: reached end of file while expecting parameter '{expected}'")]
    UnexpectedEof { line: usize, expected: &'static str },
    #[error("line {line}: found '{found}' where parameter '{expected}' was expected")]
    UnexpectedKey {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("line {line}: '{token}' is not a valid parameter definition")]
    InvalidDefinition {
        line: usize,
        expected: &'static str,
        token: String,
    },
    #[error("line {line}: the string '{value}' is not a valid {kind} for '{key}'")]
    InvalidValue {
        line: usize,
        key: &'static str,
        value: String,
        kind: ValueKind,
    },
    #[error("line {line}: the {key} value '{value}' does not fulfill the constraints of the parameter")]
    ConstraintViolation {
        line: usize,
        key: &'static str,
        value: String,
    },
    #[error("line {line}: parameter '{expected}' is not valid UTF-8")]
    InvalidEncoding { line: usize, expected: &'static str },
}

impl FormatError {
    pub fn line(&self) -> usize {
        match self {
            FormatError::UnexpectedEof { line, .. }
            | FormatError::UnexpectedKey { line, .. }
            | FormatError::InvalidDefinition { line, .. }
            | FormatError::InvalidValue { line, .. }
            | FormatError::ConstraintViolation { line, .. }
            | FormatError::InvalidEncoding { line, .. } => *line,
        }
    }
}

/// Failure of a single read pass over a file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, thiserror::Error)]
pub enum SharecartError {
    /// An operation ran before the step it depends on succeeded.
    #[error("cannot {operation}: {reason}")]
    State {
        operation: &'static str,
        reason: &'static str,
    },
    #[error("can't access parameter '{parameter}' without a loaded sharecart file")]
    NotAccessible { parameter: String },
    #[error("'{value}' is not a valid value for parameter '{parameter}'")]
    InvalidParameter { parameter: String, value: String },
    #[error("{parameter}{index} is out of bounds")]
    IndexOutOfBounds {
        parameter: &'static str,
        index: usize,
    },
    #[error("{}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("cannot access {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SharecartError {
    pub fn not_accessible(parameter: impl Into<String>) -> Self {
        SharecartError::NotAccessible {
            parameter: parameter.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl fmt::Display) -> Self {
        SharecartError::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Attach the file a read failed on.
    pub fn read_failure(path: impl Into<PathBuf>, err: ReadError) -> Self {
        let path = path.into();
        match err {
            ReadError::Io(source) => SharecartError::Persistence { path, source },
            ReadError::Format(source) => SharecartError::Format { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_messages_name_expected_and_found() {
        let err = FormatError::UnexpectedKey {
            line: 6,
            expected: "Misc2",
            found: "Misc3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 6: found 'Misc3' where parameter 'Misc2' was expected"
        );
        assert_eq!(err.line(), 6);

        let err = FormatError::ConstraintViolation {
            line: 3,
            key: "MapY",
            value: "550000".to_string(),
        };
        assert!(err
            .to_string()
            .ends_with("the MapY value '550000' does not fulfill the constraints of the parameter"));

        let err = FormatError::InvalidEncoding {
            line: 8,
            expected: "PlayerName",
        };
        assert_eq!(err.to_string(), "line 8: parameter 'PlayerName' is not valid UTF-8");
        assert_eq!(err.line(), 8);
    }

    #[test]
    fn invalid_parameter_message() {
        let err = SharecartError::invalid_parameter("x", 1024);
        assert_eq!(err.to_string(), "'1024' is not a valid value for parameter 'x'");
    }

    #[test]
    fn index_message() {
        let err = SharecartError::IndexOutOfBounds {
            parameter: "misc",
            index: 4,
        };
        assert_eq!(err.to_string(), "misc4 is out of bounds");
    }

    #[test]
    fn read_failure_keeps_kind_and_path() {
        let err = SharecartError::read_failure(
            "dat/o_o.ini",
            ReadError::Format(FormatError::UnexpectedEof {
                line: 1,
                expected: "MapX",
            }),
        );
        assert!(matches!(err, SharecartError::Format { ref path, .. } if path.ends_with("o_o.ini")));

        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = SharecartError::read_failure("dat/o_o.ini", ReadError::Io(io));
        assert!(matches!(err, SharecartError::Persistence { .. }));
    }
}
