//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Reservation status
///
/// Transitions are one-directional: `Cancelled` is terminal and nothing
/// re-enters `Pending`. Every mutation goes through the methods on
/// [`Reservation`], which reject anything outside the transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Created, awaiting staff confirmation or a deposit
    Pending,
    /// Confirmed by staff or by a successful deposit capture
    Confirmed,
    /// Guest asked to cancel, awaiting staff approval
    CancelRequested,
    /// Cancelled (terminal); kept in the store for occupancy history
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CancelRequested => "cancel_requested",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the status counts toward slot occupancy.
    pub fn occupies_seats(&self) -> bool {
        *self != Self::Cancelled
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booking for a party at one date/time slot.
///
/// Payment fields stay absent from the serialized form until a deposit
/// capture succeeds, so persisted/transmitted records show whether a
/// deposit flow ever completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation ID (UUID)
    pub id: String,
    /// Guest name
    pub name: String,
    /// Guest contact phone
    pub phone: String,
    /// Guest contact email
    pub email: String,
    /// Free-form notes (allergies, special requests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Number of seats requested (>= 1)
    pub party_size: u32,
    /// Calendar day of the booking
    pub date: NaiveDate,
    /// Slot label, one of the venue's configured slots
    pub time: String,
    /// Current lifecycle status
    pub status: ReservationStatus,
    /// When the reservation was created; display tie-break within a slot
    pub created_at: DateTime<Utc>,
    /// Whether a deposit capture succeeded
    #[serde(default)]
    pub deposit_paid: bool,
    /// Deposit amount in minor currency units, fixed when payment completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<i64>,
    /// Estimated total in minor currency units, fixed with the deposit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<i64>,
    /// External capture identifier from the payment provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
}

impl Reservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        notes: Option<String>,
        party_size: u32,
        date: NaiveDate,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            notes,
            party_size,
            date,
            time: time.into(),
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            deposit_paid: false,
            deposit_amount: None,
            total_amount: None,
            payment_reference: None,
        }
    }

    /// Guest asks to cancel. Allowed from `Pending` or `Confirmed`.
    pub fn request_cancel(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending | ReservationStatus::Confirmed => {
                self.status = ReservationStatus::CancelRequested;
                Ok(())
            }
            status => Err(DomainError::InvalidState {
                action: "request cancellation of",
                status,
            }),
        }
    }

    /// Staff confirms a pending reservation.
    pub fn confirm(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending => {
                self.status = ReservationStatus::Confirmed;
                Ok(())
            }
            status => Err(DomainError::InvalidState {
                action: "confirm",
                status,
            }),
        }
    }

    /// Staff approves a requested cancellation. Terminal.
    pub fn approve_cancel(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::CancelRequested => {
                self.status = ReservationStatus::Cancelled;
                Ok(())
            }
            status => Err(DomainError::InvalidState {
                action: "approve cancellation of",
                status,
            }),
        }
    }

    /// Apply a successful deposit capture.
    ///
    /// Forces `Confirmed` regardless of prior status and records the fixed
    /// amounts and the external capture reference. The only transition that
    /// mutates fields beyond `status`. Rejected on a cancelled reservation.
    pub fn apply_deposit_capture(
        &mut self,
        deposit_amount: i64,
        total_amount: i64,
        payment_reference: impl Into<String>,
    ) -> DomainResult<()> {
        if self.status == ReservationStatus::Cancelled {
            return Err(DomainError::InvalidState {
                action: "pay a deposit for",
                status: self.status,
            });
        }
        self.status = ReservationStatus::Confirmed;
        self.deposit_paid = true;
        self.deposit_amount = Some(deposit_amount);
        self.total_amount = Some(total_amount);
        self.payment_reference = Some(payment_reference.into());
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reservation {
        Reservation::new(
            "Ana",
            "09171234567",
            "a@b.com",
            None,
            4,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "18:00",
        )
    }

    #[test]
    fn new_reservation_is_pending_without_payment_fields() {
        let r = sample();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert!(!r.deposit_paid);
        assert!(r.deposit_amount.is_none());
        assert!(r.payment_reference.is_none());
    }

    #[test]
    fn confirm_only_from_pending() {
        let mut r = sample();
        r.confirm().unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);

        let err = r.confirm().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
        assert_eq!(r.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn cancel_request_from_pending_and_confirmed() {
        let mut r = sample();
        r.request_cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::CancelRequested);

        let mut r = sample();
        r.confirm().unwrap();
        r.request_cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::CancelRequested);
    }

    #[test]
    fn approve_cancel_is_terminal() {
        let mut r = sample();
        r.request_cancel().unwrap();
        r.approve_cancel().unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);

        assert!(r.confirm().is_err());
        assert!(r.request_cancel().is_err());
        assert!(r.approve_cancel().is_err());
        assert_eq!(r.status, ReservationStatus::Cancelled);
    }

    #[test]
    fn confirm_on_cancel_requested_fails_without_mutation() {
        let mut r = sample();
        r.request_cancel().unwrap();
        assert!(r.confirm().is_err());
        assert_eq!(r.status, ReservationStatus::CancelRequested);
    }

    #[test]
    fn deposit_capture_forces_confirmed_and_sets_fields() {
        let mut r = sample();
        r.apply_deposit_capture(400, 2000, "CAP-1").unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.deposit_paid);
        assert_eq!(r.deposit_amount, Some(400));
        assert_eq!(r.total_amount, Some(2000));
        assert_eq!(r.payment_reference.as_deref(), Some("CAP-1"));
    }

    #[test]
    fn deposit_capture_rejected_on_cancelled() {
        let mut r = sample();
        r.request_cancel().unwrap();
        r.approve_cancel().unwrap();

        let err = r.apply_deposit_capture(400, 2000, "CAP-1").unwrap_err();
        assert!(matches!(err, DomainError::InvalidState { .. }));
        assert!(!r.deposit_paid);
        assert!(r.payment_reference.is_none());
    }

    #[test]
    fn serialized_form_omits_payment_fields_until_paid() {
        let r = sample();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["deposit_paid"], false);
        assert!(json.get("deposit_amount").is_none());
        assert!(json.get("payment_reference").is_none());

        let mut r = r;
        r.apply_deposit_capture(400, 2000, "CAP-1").unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["deposit_amount"], 400);
        assert_eq!(json["payment_reference"], "CAP-1");
    }

    #[test]
    fn status_serde_uses_snake_case() {
        let s = serde_json::to_string(&ReservationStatus::CancelRequested).unwrap();
        assert_eq!(s, "\"cancel_requested\"");
        let parsed: ReservationStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, ReservationStatus::Cancelled);
    }
}
