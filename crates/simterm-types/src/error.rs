//! Error types for simterm.

use std::io;

/// Boxed error returned by command handlers that fail unexpectedly.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the simterm framework.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// No registered command has this exact name.
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The name is registered, but no overload accepts the argument count.
    #[error("command found, but the parameter arity is not right: {name} ({given} params given)")]
    ArityMismatch { name: String, given: usize },

    /// The handler ran and reported failure, or returned an error.
    #[error("command execution failed: {name}")]
    CommandExecutionFailed {
        name: String,
        #[source]
        cause: Option<BoxError>,
    },

    /// A command could not be registered.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TermError {
    /// Render the error and its source chain as a single line.
    pub fn to_message_line(&self) -> String {
        let mut line = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            line.push_str(": ");
            line.push_str(&cause.to_string());
            source = cause.source();
        }
        line
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TermError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_not_found_display() {
        let e = TermError::CommandNotFound("frob".into());
        assert_eq!(format!("{e}"), "command not found: frob");
    }

    #[test]
    fn arity_mismatch_display() {
        let e = TermError::ArityMismatch {
            name: "cd".into(),
            given: 3,
        };
        let msg = format!("{e}");
        assert!(msg.contains("arity"));
        assert!(msg.contains("cd"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn execution_failed_without_cause() {
        let e = TermError::CommandExecutionFailed {
            name: "cd".into(),
            cause: None,
        };
        assert_eq!(format!("{e}"), "command execution failed: cd");
        assert!(std::error::Error::source(&e).is_none());
        assert_eq!(e.to_message_line(), "command execution failed: cd");
    }

    #[test]
    fn execution_failed_keeps_cause() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "no such dir");
        let e = TermError::CommandExecutionFailed {
            name: "cd".into(),
            cause: Some(Box::new(cause)),
        };
        let source = std::error::Error::source(&e).unwrap();
        assert_eq!(source.to_string(), "no such dir");
        assert_eq!(
            e.to_message_line(),
            "command execution failed: cd: no such dir"
        );
    }

    #[test]
    fn invalid_command_display() {
        let e = TermError::InvalidCommand("empty name".into());
        assert_eq!(format!("{e}"), "invalid command: empty name");
    }

    #[test]
    fn backend_error_display() {
        let e = TermError::Backend("raw mode unavailable".into());
        assert_eq!(format!("{e}"), "backend error: raw mode unavailable");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let e: TermError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: TermError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn error_is_debug() {
        let e = TermError::CommandNotFound("x".into());
        assert!(format!("{e:?}").contains("CommandNotFound"));
    }
}
