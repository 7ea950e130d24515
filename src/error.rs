/// Application error carrying the process exit code it maps to.
///
/// Exit codes:
/// - `2`: usage or input errors (missing file/column, unparseable values, bad flags)
/// - `3`: the input parsed but holds no rows
/// - `4`: terminal/runtime failures
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Shorthand for a usage/input error (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
