//! Errors raised by the review scheduler and session helpers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    /// Input outside the accepted domain (unknown rating, mismatched lengths).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Card scheduling state that breaks an invariant (negative/NaN interval,
    /// ease factor below the floor, due date out of range).
    #[error("invalid review state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
