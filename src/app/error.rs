use serde::Serialize;
use std::fmt;

pub const ERR_VALIDATION: &str = "ERR_VALIDATION";
pub const ERR_DEPENDENCY: &str = "ERR_DEPENDENCY";
pub const ERR_SYSTEM: &str = "ERR_SYSTEM";
pub const ERR_COMMAND: &str = "ERR_COMMAND";
pub const ERR_STORAGE: &str = "ERR_STORAGE";
pub const ERR_NETWORK: &str = "ERR_NETWORK";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AppError {
    pub error: String,
    pub code: String,
    pub trace_id: String,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            trace_id: trace_id.into(),
        }
    }

    pub fn validation(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ERR_VALIDATION, message, trace_id)
    }

    pub fn dependency(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ERR_DEPENDENCY, message, trace_id)
    }

    pub fn system(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ERR_SYSTEM, message, trace_id)
    }

    /// A simulated or real device command that ran and reported failure.
    pub fn command(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ERR_COMMAND, message, trace_id)
    }

    pub fn storage(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ERR_STORAGE, message, trace_id)
    }

    pub fn network(message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self::new(ERR_NETWORK, message, trace_id)
    }

    pub fn is_command_failure(&self) -> bool {
        self.code == ERR_COMMAND
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.code)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message_and_code() {
        let err = AppError::command("✗ Command failed: adb devices", "trace-1");
        assert_eq!(err.to_string(), "✗ Command failed: adb devices (ERR_COMMAND)");
        assert!(err.is_command_failure());
        assert!(!AppError::storage("disk full", "").is_command_failure());
    }
}
