//! Venue settings REST API handlers

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{
    PricingDto, UpdateCapacityRequest, UpdatePricingRequest, VenueSettingsResponse,
};
use crate::config::PricingConfig;
use crate::interfaces::http::auth::StaffAuth;
use crate::interfaces::http::common::{reject, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn settings(state: &AppState) -> VenueSettingsResponse {
    VenueSettingsResponse {
        slots: state.reservations.slots().to_vec(),
        capacity_per_slot: state.reservations.capacity(),
        pricing: PricingDto::from(state.reservations.pricing()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/venue",
    tag = "Venue",
    responses(
        (status = 200, description = "Venue slots, capacity and pricing", body = ApiResponse<VenueSettingsResponse>)
    )
)]
pub async fn get_venue_settings(
    State(state): State<AppState>,
) -> Json<ApiResponse<VenueSettingsResponse>> {
    Json(ApiResponse::success(settings(&state)))
}

#[utoipa::path(
    put,
    path = "/api/v1/venue/capacity",
    tag = "Venue",
    security(("staff_token" = [])),
    request_body = UpdateCapacityRequest,
    responses(
        (status = 200, description = "Capacity updated", body = ApiResponse<VenueSettingsResponse>),
        (status = 401, description = "Missing staff token"),
        (status = 403, description = "Invalid staff token")
    )
)]
pub async fn update_capacity(
    _auth: StaffAuth,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UpdateCapacityRequest>,
) -> Result<Json<ApiResponse<VenueSettingsResponse>>, HandlerError> {
    state
        .reservations
        .set_capacity(body.capacity_per_slot)
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(settings(&state))))
}

#[utoipa::path(
    put,
    path = "/api/v1/venue/pricing",
    tag = "Venue",
    security(("staff_token" = [])),
    request_body = UpdatePricingRequest,
    responses(
        (status = 200, description = "Pricing updated; already-initiated deposits keep their amounts", body = ApiResponse<VenueSettingsResponse>),
        (status = 401, description = "Missing staff token"),
        (status = 403, description = "Invalid staff token")
    )
)]
pub async fn update_pricing(
    _auth: StaffAuth,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UpdatePricingRequest>,
) -> Result<Json<ApiResponse<VenueSettingsResponse>>, HandlerError> {
    state
        .reservations
        .set_pricing(PricingConfig {
            price_per_seat: body.price_per_seat,
            deposit_percent: body.deposit_percent,
            minimum_deposit: body.minimum_deposit,
            currency: body.currency,
        })
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(settings(&state))))
}
