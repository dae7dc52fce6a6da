//! Application ports

pub mod outbound;

pub use outbound::{Capture, Notifier, NotifierError, PaymentGateway};
