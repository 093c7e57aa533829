//! Quality check errors.
//!
//! A `CheckError` never fails a whole run; the runner turns it into a
//! failed outcome for the offending check.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    /// The tool command line was empty.
    #[error("check {0} has an empty command")]
    EmptyCommand(String),

    /// The tool could not be started.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {secs} seconds")]
    Timeout { tool: String, secs: u64 },

    /// The tool ran but reported a fatal status.
    #[error("{tool} exited with status {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// The tool's output could not be understood.
    #[error("failed to parse {tool} output: {message}")]
    Parse { tool: String, message: String },

    #[error("invalid file pattern: {0}")]
    Pattern(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<glob::PatternError> for CheckError {
    fn from(err: glob::PatternError) -> Self {
        CheckError::Pattern(err.to_string())
    }
}

impl From<regex::Error> for CheckError {
    fn from(err: regex::Error) -> Self {
        CheckError::Pattern(err.to_string())
    }
}

/// Result type for quality checks.
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failed_display() {
        let err = CheckError::ToolFailed {
            tool: "eslint".to_string(),
            code: 2,
            stderr: "Oops! Something went wrong!".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "eslint exited with status 2: Oops! Something went wrong!"
        );
    }

    #[test]
    fn test_pattern_error_converts() {
        let err: CheckError = glob::Pattern::new("[").unwrap_err().into();
        assert!(matches!(err, CheckError::Pattern(_)));
    }
}
