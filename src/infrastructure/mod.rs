//! Infrastructure layer: adapters for storage and external services.

pub mod notifier;
pub mod paypal;
pub mod storage;

pub use notifier::NotificationApiClient;
pub use paypal::PayPalGateway;
pub use storage::{JsonFileStore, MemoryStore};
