// Queue operation errors

use crate::domain::{Department, DomainError};
use thiserror::Error;

/// Precondition failures of a single queue operation.
///
/// None of these are transient; the caller decides how to present them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Invalid department: {0}")]
    InvalidDepartment(String),

    #[error("Unknown counter: {0}")]
    UnknownCounter(String),

    #[error("Counter already registered: {0}")]
    DuplicateCounter(String),

    #[error("Counter {counter_id} is busy serving {token}")]
    CounterBusy { counter_id: String, token: String },

    #[error("No waiting tickets for {0}")]
    QueueEmpty(Department),

    #[error("Counter {0} has no active service")]
    NoActiveService(String),

    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("All tokens for {0} are in use")]
    TokenSpaceExhausted(Department),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
