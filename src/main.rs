//! TableTime reservation service entry point.
//!
//! Reads configuration from TOML file (~/.config/tabletime/config.toml,
//! override with `TABLETIME_CONFIG`).

use std::sync::Arc;

use tracing::{error, info, warn};

use tabletime::application::ports::{Notifier, NotifierError, PaymentGateway};
use tabletime::application::{ReservationService, ReviewService};
use tabletime::config::AppConfig;
use tabletime::domain::{PaymentError, ReservationRepository, ReviewRepository};
use tabletime::infrastructure::{
    JsonFileStore, MemoryStore, NotificationApiClient, PayPalGateway,
};
use tabletime::{create_api_router, default_config_path};

/// Gateway used when no payment credentials are configured. Every order
/// attempt fails cleanly instead of reaching a provider with empty auth.
struct DisabledGateway;

#[async_trait::async_trait]
impl PaymentGateway for DisabledGateway {
    async fn create_order(
        &self,
        _amount_minor: i64,
        _currency: &str,
        _description: &str,
    ) -> Result<String, PaymentError> {
        Err(PaymentError::Unknown(
            "payment gateway is not configured".to_string(),
        ))
    }

    async fn capture_order(
        &self,
        _order_id: &str,
    ) -> Result<tabletime::application::ports::Capture, PaymentError> {
        Err(PaymentError::Unknown(
            "payment gateway is not configured".to_string(),
        ))
    }
}

/// Notifier used when no notification credentials are configured.
struct DisabledNotifier;

#[async_trait::async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, _r: &str, _s: &str, _h: &str) -> Result<(), NotifierError> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("TABLETIME_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting TableTime reservation service...");

    // ── Storage ────────────────────────────────────────────────
    let (reservation_store, review_store): (
        Arc<dyn ReservationRepository>,
        Arc<dyn ReviewRepository>,
    ) = match cfg.storage.backend.as_str() {
        "memory" => {
            warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
        _ => {
            let path = cfg.storage.data_file_path();
            let store = Arc::new(JsonFileStore::open(&path)?);
            (store.clone(), store)
        }
    };

    // ── External services ──────────────────────────────────────
    let payments: Arc<dyn PaymentGateway> = if cfg.payment.client_id.is_empty() {
        warn!("Payment credentials not configured; deposit flow is disabled");
        Arc::new(DisabledGateway)
    } else {
        info!("Payment gateway: {}", cfg.payment.base_url);
        Arc::new(PayPalGateway::new(&cfg.payment)?)
    };

    let notifier: Arc<dyn Notifier> = if cfg.notifications.project_id.is_empty() {
        warn!("Notification credentials not configured; staff emails are disabled");
        Arc::new(DisabledNotifier)
    } else {
        Arc::new(NotificationApiClient::new(&cfg.notifications)?)
    };

    let staff_email = if cfg.notifications.project_id.is_empty() {
        None
    } else {
        cfg.notifications.staff_email.clone()
    };

    // ── Services ───────────────────────────────────────────────
    let reservations = Arc::new(ReservationService::new(
        reservation_store,
        payments,
        notifier,
        cfg.venue.clone(),
        cfg.pricing.clone(),
        staff_email,
    ));
    let reviews = Arc::new(ReviewService::new(review_store));

    if cfg.security.staff_token.is_empty() {
        warn!("No staff token configured; staff endpoints are disabled");
    }

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(reservations, reviews, &cfg.security.staff_token);
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("TableTime reservation service shutdown complete");
    Ok(())
}
