//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ReservationService, ReviewService};
use crate::interfaces::http::auth::StaffToken;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::{health, reservations, reviews, venue};

/// Shared state for all REST routes
#[derive(Clone)]
pub struct AppState {
    pub reservations: Arc<ReservationService>,
    pub reviews: Arc<ReviewService>,
    pub staff_token: StaffToken,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for StaffToken {
    fn from_ref(s: &AppState) -> Self {
        s.staff_token.clone()
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "staff_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Staff-Token"))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Reservations
        reservations::handlers::create_reservation,
        reservations::handlers::list_reservations,
        reservations::handlers::get_reservation,
        reservations::handlers::get_availability,
        reservations::handlers::request_cancel,
        reservations::handlers::confirm_reservation,
        reservations::handlers::approve_cancel,
        // Deposits
        reservations::handlers::initiate_deposit,
        reservations::handlers::capture_deposit,
        // Venue
        venue::handlers::get_venue_settings,
        venue::handlers::update_capacity,
        venue::handlers::update_pricing,
        // Reviews
        reviews::handlers::list_reviews,
        reviews::handlers::create_review,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthResponse,
            // Reservations
            reservations::ReservationDto,
            reservations::CreateReservationRequest,
            reservations::CreateReservationResponse,
            reservations::AvailabilityResponse,
            reservations::SlotAvailabilityDto,
            // Deposits
            reservations::DepositOrderResponse,
            reservations::CaptureDepositRequest,
            // Venue
            venue::VenueSettingsResponse,
            venue::PricingDto,
            venue::UpdateCapacityRequest,
            venue::UpdatePricingRequest,
            // Reviews
            reviews::ReviewDto,
            reviews::CreateReviewRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Reservations", description = "Guest reservations: booking, day listings, lifecycle transitions"),
        (name = "Deposits", description = "Deposit payment flow: initiate an order, capture it after payer approval"),
        (name = "Venue", description = "Venue setup: slots, per-slot capacity, deposit pricing"),
        (name = "Reviews", description = "Guest reviews"),
    ),
    info(
        title = "TableTime Reservation API",
        version = "1.0.0",
        description = "REST API for restaurant time-slot reservations with deposit payments",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    reservations: Arc<ReservationService>,
    reviews: Arc<ReviewService>,
    staff_token: &str,
) -> Router {
    let state = AppState {
        reservations,
        reviews,
        staff_token: StaffToken(Arc::from(staff_token)),
        started_at: Arc::new(Instant::now()),
    };

    let reservation_routes = Router::new()
        .route(
            "/",
            post(reservations::handlers::create_reservation)
                .get(reservations::handlers::list_reservations),
        )
        .route("/{id}", get(reservations::handlers::get_reservation))
        .route(
            "/{id}/cancel-request",
            post(reservations::handlers::request_cancel),
        )
        .route(
            "/{id}/confirm",
            post(reservations::handlers::confirm_reservation),
        )
        .route(
            "/{id}/approve-cancel",
            post(reservations::handlers::approve_cancel),
        )
        .route(
            "/{id}/deposit/initiate",
            post(reservations::handlers::initiate_deposit),
        )
        .route(
            "/{id}/deposit/capture",
            post(reservations::handlers::capture_deposit),
        );

    let venue_routes = Router::new()
        .route("/", get(venue::handlers::get_venue_settings))
        .route("/capacity", put(venue::handlers::update_capacity))
        .route("/pricing", put(venue::handlers::update_pricing));

    let review_routes = Router::new().route(
        "/",
        get(reviews::handlers::list_reviews).post(reviews::handlers::create_review),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::handlers::health_check))
        .route(
            "/api/v1/availability",
            get(reservations::handlers::get_availability),
        )
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/venue", venue_routes)
        .nest("/api/v1/reviews", review_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use super::*;
    use crate::application::ports::{Capture, Notifier, NotifierError, PaymentGateway};
    use crate::config::{PricingConfig, VenueConfig};
    use crate::domain::PaymentError;
    use crate::infrastructure::storage::memory::MemoryStore;

    struct StubGateway;

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_order(
            &self,
            _amount_minor: i64,
            _currency: &str,
            _description: &str,
        ) -> Result<String, PaymentError> {
            Ok("ORD-1".to_string())
        }

        async fn capture_order(&self, order_id: &str) -> Result<Capture, PaymentError> {
            Ok(Capture {
                capture_id: format!("CAP-{}", order_id),
                payer_name: None,
            })
        }
    }

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(&self, _r: &str, _s: &str, _h: &str) -> Result<(), NotifierError> {
            Ok(())
        }
    }

    fn app() -> Router {
        let store = Arc::new(MemoryStore::new());
        let reservations = Arc::new(ReservationService::new(
            store.clone(),
            Arc::new(StubGateway),
            Arc::new(NullNotifier),
            VenueConfig::default(),
            PricingConfig::default(),
            None,
        ));
        let reviews = Arc::new(ReviewService::new(store));
        create_api_router(reservations, reviews, "staff-secret")
    }

    async fn send(app: &mut Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let mut app = app();
        let (status, body) = send(&mut app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn booking_flow_over_http() {
        let mut app = app();

        let (status, body) = send(
            &mut app,
            post_json(
                "/api/v1/reservations",
                json!({
                    "name": "Ana",
                    "phone": "09171234567",
                    "email": "a@b.com",
                    "party_size": 4,
                    "date": "2024-05-01",
                    "time": "18:00"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["deposit_due"], 400);
        assert_eq!(body["data"]["total_due"], 2000);
        assert_eq!(body["data"]["reservation"]["status"], "pending");
        let id = body["data"]["reservation"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &mut app,
            get_req("/api/v1/reservations?date=2024-05-01"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &mut app,
            get_req("/api/v1/availability?date=2024-05-01"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let slots = body["data"]["slots"].as_array().unwrap();
        let dinner = slots.iter().find(|s| s["time"] == "18:00").unwrap();
        assert_eq!(dinner["used"], 4);
        assert_eq!(dinner["remaining"], 36);

        // deposit flow
        let (status, body) = send(
            &mut app,
            post_json(&format!("/api/v1/reservations/{}/deposit/initiate", id), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &mut app,
            post_json(
                &format!("/api/v1/reservations/{}/deposit/capture", id),
                json!({ "order_id": order_id }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "confirmed");
        assert_eq!(body["data"]["deposit_paid"], true);
        assert_eq!(body["data"]["deposit_amount"], 400);
    }

    #[tokio::test]
    async fn invalid_booking_returns_422_envelope() {
        let mut app = app();
        let (status, body) = send(
            &mut app,
            post_json(
                "/api/v1/reservations",
                json!({
                    "name": "Ana",
                    "phone": "123",
                    "email": "nope",
                    "party_size": 0,
                    "date": "2024-05-01",
                    "time": "18:00"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn unknown_reservation_returns_404() {
        let mut app = app();
        let (status, body) = send(&mut app, get_req("/api/v1/reservations/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn staff_endpoints_require_the_token() {
        let mut app = app();

        let (status, _) = send(
            &mut app,
            Request::builder()
                .method("PUT")
                .uri("/api/v1/venue/capacity")
                .header("content-type", "application/json")
                .body(Body::from(json!({"capacity_per_slot": 10}).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &mut app,
            Request::builder()
                .method("PUT")
                .uri("/api/v1/venue/capacity")
                .header("content-type", "application/json")
                .header("X-Staff-Token", "staff-secret")
                .body(Body::from(json!({"capacity_per_slot": 10}).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["capacity_per_slot"], 10);
    }

    #[tokio::test]
    async fn confirm_requires_staff_token() {
        let mut app = app();
        let (_, body) = send(
            &mut app,
            post_json(
                "/api/v1/reservations",
                json!({
                    "name": "Ana",
                    "phone": "09171234567",
                    "email": "a@b.com",
                    "party_size": 2,
                    "date": "2024-05-01",
                    "time": "18:00"
                }),
            ),
        )
        .await;
        let id = body["data"]["reservation"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &mut app,
            post_json(&format!("/api/v1/reservations/{}/confirm", id), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &mut app,
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/reservations/{}/confirm", id))
                .header("X-Staff-Token", "staff-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "confirmed");
    }

    #[tokio::test]
    async fn reviews_roundtrip_over_http() {
        let mut app = app();
        let (status, _) = send(
            &mut app,
            post_json(
                "/api/v1/reviews",
                json!({"name": "Ana", "rating": 5, "comment": "Lovely evening"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&mut app, get_req("/api/v1/reviews")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["rating"], 5);

        let (status, _) = send(
            &mut app,
            post_json(
                "/api/v1/reviews",
                json!({"name": "Ana", "rating": 9, "comment": "x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
