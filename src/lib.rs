//! # TableTime Reservation Service
//!
//! Time-slot restaurant reservation system with deposit payments.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, capacity rules and repository traits
//! - **application**: Reservation lifecycle, deposit reconciliation, reviews
//! - **infrastructure**: External concerns (storage, payment gateway, notifier)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
