//! Core business entities, types and traits

pub mod capacity;
pub mod error;
pub mod reservation;
pub mod review;

// Re-export commonly used types
pub use error::{DomainError, DomainResult, PaymentError};
pub use reservation::{Reservation, ReservationRepository, ReservationStatus};
pub use review::{Review, ReviewRepository};
