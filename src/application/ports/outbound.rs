//! Outbound port traits
//!
//! Contracts the application layer needs from the outside world. The
//! lifecycle manager depends only on these traits; production adapters
//! live in `infrastructure`.

use async_trait::async_trait;

use crate::domain::PaymentError;

/// A successful capture reported by the payment provider.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Opaque external capture identifier
    pub capture_id: String,
    /// Payer display name, when the provider reports one
    pub payer_name: Option<String>,
}

/// External payment capture service (order-create + capture primitives).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for `amount_minor` units of `currency`.
    /// Returns the provider's order ID.
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        description: &str,
    ) -> Result<String, PaymentError>;

    /// Capture a previously created order.
    async fn capture_order(&self, order_id: &str) -> Result<Capture, PaymentError>;
}

/// Outbound notification delivery errors
#[derive(Debug, thiserror::Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifierError(pub String);

/// External notification delivery. Fire-and-forget from the caller's point
/// of view: the lifecycle manager never awaits delivery on its critical
/// path and never retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotifierError>;
}
