//! Error taxonomy for the CI harness.

use std::path::PathBuf;

/// Errors produced while preparing or running CI steps.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("host identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("invalid harness directory {path:?}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("invalid execution profile '{profile}': {reason}")]
    InvalidProfile { profile: String, reason: String },

    #[error("unknown step: {0}")]
    UnknownStep(String),

    #[error("step '{step}' has empty command")]
    EmptyCommand { step: String },

    #[error("step '{step}' could not be started: {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },

    #[error("step '{step}' exited with code {exit_code}")]
    ProcessFailed { step: String, exit_code: i32 },

    #[error("step '{step}' reported a simulation failure")]
    ContentFailed { step: String, output: String },
}

impl HarnessError {
    /// Whether this error belongs to a single step rather than the environment.
    pub fn is_step_failure(&self) -> bool {
        matches!(
            self,
            HarnessError::EmptyCommand { .. }
                | HarnessError::Spawn { .. }
                | HarnessError::ProcessFailed { .. }
                | HarnessError::ContentFailed { .. }
        )
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_display_names_step_and_code() {
        let err = HarnessError::ProcessFailed {
            step: "clippy".to_string(),
            exit_code: 101,
        };
        assert_eq!(err.to_string(), "step 'clippy' exited with code 101");
    }

    #[test]
    fn test_step_failures_are_classified() {
        let content = HarnessError::ContentFailed {
            step: "sim:fsm".to_string(),
            output: "~~FAIL~~".to_string(),
        };
        assert!(content.is_step_failure());
        assert!(!HarnessError::IdentityUnavailable("no id".to_string()).is_step_failure());
        assert!(!HarnessError::UnknownStep("lint".to_string()).is_step_failure());
    }
}
