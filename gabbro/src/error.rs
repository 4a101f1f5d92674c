use thiserror::Error;

/// Errors raised by the enforcement pass.
///
/// The pass only runs on plans already validated by earlier compilation
/// stages, so every variant here signals a bug upstream in the pipeline
/// rather than a user mistake.
#[derive(Debug, Error)]
pub enum OptError {
    #[error("paired key lists must have equal length, got {left} and {right}")]
    KeyArityMismatch { left: usize, right: usize },
    #[error("internal error: {0}")]
    Internal(String),
}

pub type OptResult<T> = Result<T, OptError>;
