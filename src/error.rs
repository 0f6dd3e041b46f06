//! Application-level error carrying a process exit code.
//!
//! Exit codes:
//! - `2`: bad input, configuration, or local IO
//! - `3`: not enough data to compute a result
//! - `4`: data, computation, or network failure

use crate::fit::FitError;

#[derive(Clone)]
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

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::InsufficientData { .. } => 3,
            FitError::InvalidDomain { .. } | FitError::InvalidReferenceVolume { .. } => 2,
            FitError::Numerical { .. } => 4,
        };
        AppError::new(code, format!("Calibration fit failed: {err}"))
    }
}
