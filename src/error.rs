//! Application-level error type.
//!
//! Every fallible step of the pipeline eventually surfaces as an [`AppError`]
//! carrying the process exit code:
//!
//! - `2`: configuration or I/O fault
//! - `3`: aggregation fault (no qualifying data under an aborting policy)
//! - `4`: numeric fault (e.g. a regression that could not be solved)

use crate::stats::StatsError;
use crate::sweep::SweepError;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_AGGREGATION: u8 = 3;
pub const EXIT_NUMERIC: u8 = 4;

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

    /// Shorthand for a configuration / I/O fault.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
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

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        AppError::new(EXIT_AGGREGATION, err.to_string())
    }
}

impl From<SweepError> for AppError {
    fn from(err: SweepError) -> Self {
        let code = match err {
            SweepError::InvalidRange { .. } => EXIT_CONFIG,
            SweepError::NoQualifyingData { .. } => EXIT_AGGREGATION,
        };
        AppError::new(code, err.to_string())
    }
}
