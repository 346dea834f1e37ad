//! CLI-level error conditions that map to specific exit codes.

use thiserror::Error;

/// Errors that terminate a command with a specific exit code.
///
/// Any other `anyhow` error exits with status 1 after printing its chain.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid arguments or preconditions. Exit status 2.
    #[error("Invalid value: {0}")]
    BadParameter(String),

    /// Silent exit with the given status (gate failures, nothing to do).
    #[error("exit with status {0}")]
    Exit(u8),
}

/// Shorthand for a [`CliError::BadParameter`] wrapped in `anyhow`.
pub fn bad_parameter(message: impl Into<String>) -> anyhow::Error {
    CliError::BadParameter(message.into()).into()
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::BadParameter(_) => 2,
            CliError::Exit(code) => *code,
        }
    }
}
