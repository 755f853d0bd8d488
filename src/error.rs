use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProfilerError {
    #[error("profile registry is full ({capacity} entries), cannot add '{name}'")]
    CapacityExceeded { capacity: usize, name: String },

    #[error("clock source unavailable: {0}")]
    ClockUnavailable(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLock(String),

    #[error("failed to write report: {0}")]
    Io(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<std::io::Error> for ProfilerError {
    fn from(err: std::io::Error) -> Self {
        ProfilerError::Io(err.to_string())
    }
}

impl From<std::fmt::Error> for ProfilerError {
    fn from(err: std::fmt::Error) -> Self {
        ProfilerError::Io(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ProfilerError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        ProfilerError::PoisonedLock(err.to_string())
    }
}
