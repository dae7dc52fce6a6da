//! Application layer: services orchestrating the domain and outbound ports.

pub mod notifications;
pub mod ports;
pub mod reservations;
pub mod reviews;

pub use reservations::{
    BookingRequest, DepositOrder, Quote, ReservationService, SlotAvailability,
};
pub use reviews::ReviewService;
