//! Reservation DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{DepositOrder, SlotAvailability};
use crate::domain::Reservation;

/// Request to create a reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Guest name
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    /// Contact phone number
    #[validate(length(min = 7, max = 32, message = "enter a valid phone number"))]
    pub phone: String,
    /// Contact email
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    /// Free-form note for staff
    pub notes: Option<String>,
    /// Number of guests
    #[validate(range(min = 1, max = 1000, message = "party size must be between 1 and 1000"))]
    pub party_size: u32,
    /// Reservation date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Slot label, e.g. "18:00"
    #[validate(length(min = 1, message = "time slot is required"))]
    pub time: String,
}

/// Day selector for list/availability queries
#[derive(Debug, Deserialize, IntoParams)]
pub struct DayQuery {
    /// Date (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub party_size: u32,
    pub date: String,
    pub time: String,
    pub status: String,
    pub created_at: String,
    pub deposit_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            name: r.name,
            phone: r.phone,
            email: r.email,
            notes: r.notes,
            party_size: r.party_size,
            date: r.date.to_string(),
            time: r.time,
            status: r.status.as_str().to_string(),
            created_at: r.created_at.to_rfc3339(),
            deposit_paid: r.deposit_paid,
            deposit_amount: r.deposit_amount,
            total_amount: r.total_amount,
            payment_reference: r.payment_reference,
        }
    }
}

/// Response from creating a reservation, including the deposit estimate
/// under current pricing
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateReservationResponse {
    pub reservation: ReservationDto,
    /// Estimated deposit due, minor currency units
    pub deposit_due: i64,
    /// Estimated bill total, minor currency units
    pub total_due: i64,
    pub currency: String,
}

/// Response from initiating a deposit payment
#[derive(Debug, Serialize, ToSchema)]
pub struct DepositOrderResponse {
    /// Payment provider order ID; pass back to the capture endpoint
    pub order_id: String,
    pub deposit: i64,
    pub total: i64,
    pub currency: String,
}

impl From<DepositOrder> for DepositOrderResponse {
    fn from(o: DepositOrder) -> Self {
        Self {
            order_id: o.order_id,
            deposit: o.deposit,
            total: o.total,
            currency: o.currency,
        }
    }
}

/// Request to capture an initiated deposit payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CaptureDepositRequest {
    /// Order ID returned by the initiate endpoint
    #[validate(length(min = 1, message = "order_id is required"))]
    pub order_id: String,
}

/// Per-slot seat usage
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotAvailabilityDto {
    pub time: String,
    pub used: u32,
    pub remaining: u32,
}

impl From<SlotAvailability> for SlotAvailabilityDto {
    fn from(s: SlotAvailability) -> Self {
        Self {
            time: s.time,
            used: s.used,
            remaining: s.remaining,
        }
    }
}

/// Seat availability for one day
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub date: String,
    pub capacity_per_slot: u32,
    pub slots: Vec<SlotAvailabilityDto>,
}
