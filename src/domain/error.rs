//! Domain errors

use thiserror::Error;

use super::reservation::ReservationStatus;

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Slot {time} on {date} cannot seat {requested} more guests ({remaining} remaining)")]
    CapacityExceeded {
        date: String,
        time: String,
        requested: u32,
        remaining: u32,
    },

    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Cannot {action} a reservation with status {status}")]
    InvalidState {
        action: &'static str,
        status: ReservationStatus,
    },

    #[error("Payment failed: {0}")]
    Payment(#[from] PaymentError),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Why a deposit capture did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment instrument declined")]
    Declined,

    #[error("payer action required")]
    PayerActionRequired,

    #[error("payment service timed out")]
    Timeout,

    #[error("payment service error: {0}")]
    Unknown(String),
}

impl PaymentError {
    /// Whether the caller should restart the payment flow with a fresh order
    /// rather than abandon it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Declined | Self::PayerActionRequired)
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
