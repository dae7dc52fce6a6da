//! Reservation REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AvailabilityResponse, CaptureDepositRequest, CreateReservationRequest,
    CreateReservationResponse, DayQuery, DepositOrderResponse, ReservationDto,
};
use crate::application::BookingRequest;
use crate::interfaces::http::auth::StaffAuth;
use crate::interfaces::http::common::{reject, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<CreateReservationResponse>),
        (status = 409, description = "Slot cannot seat the party"),
        (status = 422, description = "Invalid booking data")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateReservationResponse>>), HandlerError> {
    let reservation = state
        .reservations
        .create(BookingRequest {
            name: body.name,
            phone: body.phone,
            email: body.email,
            notes: body.notes,
            party_size: body.party_size,
            date: body.date,
            time: body.time,
        })
        .await
        .map_err(reject)?;

    let quote = state.reservations.quote_for(reservation.party_size);
    let response = CreateReservationResponse {
        reservation: reservation.into(),
        deposit_due: quote.deposit,
        total_due: quote.total,
        currency: state.reservations.currency_code(),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(DayQuery),
    responses(
        (status = 200, description = "Reservations for the day, ordered by slot then newest first", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, HandlerError> {
    let reservations = state
        .reservations
        .list_for_day(query.date)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, HandlerError> {
    let reservation = state.reservations.get(&id).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Reservations",
    params(DayQuery),
    responses(
        (status = 200, description = "Per-slot seat usage for the day", body = ApiResponse<AvailabilityResponse>)
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, HandlerError> {
    let slots = state
        .reservations
        .availability(query.date)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(AvailabilityResponse {
        date: query.date.to_string(),
        capacity_per_slot: state.reservations.capacity(),
        slots: slots.into_iter().map(Into::into).collect(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel-request",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Cancellation requested", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation cannot be cancelled from its current status")
    )
)]
pub async fn request_cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, HandlerError> {
    let reservation = state.reservations.request_cancel(&id).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/confirm",
    tag = "Reservations",
    security(("staff_token" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Only pending reservations can be confirmed")
    )
)]
pub async fn confirm_reservation(
    _auth: StaffAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, HandlerError> {
    let reservation = state.reservations.confirm(&id).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/approve-cancel",
    tag = "Reservations",
    security(("staff_token" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Cancellation approved, seats freed", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "No cancellation was requested")
    )
)]
pub async fn approve_cancel(
    _auth: StaffAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, HandlerError> {
    let reservation = state.reservations.approve_cancel(&id).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/deposit/initiate",
    tag = "Deposits",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Deposit order created", body = ApiResponse<DepositOrderResponse>),
        (status = 402, description = "Payment service rejected the order"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is cancelled or already paid")
    )
)]
pub async fn initiate_deposit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DepositOrderResponse>>, HandlerError> {
    let order = state.reservations.initiate_deposit(&id).await.map_err(reject)?;
    Ok(Json(ApiResponse::success(order.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/deposit/capture",
    tag = "Deposits",
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = CaptureDepositRequest,
    responses(
        (status = 200, description = "Deposit captured; reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 402, description = "Capture failed; safe to retry with a fresh order"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Reservation is cancelled")
    )
)]
pub async fn capture_deposit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<CaptureDepositRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, HandlerError> {
    let reservation = state
        .reservations
        .complete_deposit(&id, &body.order_id)
        .await
        .map_err(reject)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
