use thiserror::Error;

/// Failure modes of a blur or fill invocation.
///
/// Nothing is ever partially committed: whichever variant is returned,
/// the backing store holds exactly what it held before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlurError {
    /// Rejected before any I/O; retrying with corrected input is safe.
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("pixel store I/O failed: {0}")]
    Io(String),
    /// A buffer did not hold `width * height * channels` bytes.
    #[error("buffer holds {actual} bytes, expected {expected}")]
    Shape { expected: usize, actual: usize },
    #[error("operation cancelled before commit")]
    Cancelled,
}

impl BlurError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Returns `Ok(())` when `actual == expected`, otherwise a `Shape` error.
    pub fn check_len(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::Shape { expected, actual })
        }
    }
}
