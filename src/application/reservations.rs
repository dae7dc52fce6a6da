//! Reservation lifecycle manager
//!
//! Owns reservation records and every state transition, keeps the capacity
//! invariant by serializing capacity-check-plus-insert per `(date, time)`
//! slot, and coordinates the deposit flow with the external payment
//! gateway. Staff notifications fire at creation and deposit capture,
//! best-effort and off the critical path.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::application::notifications;
use crate::application::ports::{Notifier, PaymentGateway};
use crate::config::{PricingConfig, VenueConfig};
use crate::domain::capacity;
use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationRepository, ReservationStatus,
};

/// Upper bound on guests per booking; far above any real capacity, it only
/// exists to keep capacity arithmetic well clear of integer limits.
pub const MAX_PARTY_SIZE: u32 = 1_000;

/// A validated booking request.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub party_size: u32,
    pub date: NaiveDate,
    pub time: String,
}

/// Estimated total and deposit for a party, minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub total: i64,
    pub deposit: i64,
}

/// Handle returned by `initiate_deposit` for presentation to the payer.
#[derive(Debug, Clone)]
pub struct DepositOrder {
    pub order_id: String,
    pub deposit: i64,
    pub total: i64,
    pub currency: String,
}

/// Per-slot seat usage for one day.
#[derive(Debug, Clone)]
pub struct SlotAvailability {
    pub time: String,
    pub used: u32,
    pub remaining: u32,
    pub capacity: u32,
}

/// Amounts fixed when a deposit order was created (never recomputed).
#[derive(Debug, Clone)]
struct DepositQuote {
    reservation_id: String,
    deposit: i64,
    total: i64,
}

pub struct ReservationService {
    store: Arc<dyn ReservationRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
    slots: Vec<String>,
    capacity: AtomicU32,
    pricing: RwLock<PricingConfig>,
    staff_email: Option<String>,
    // Capacity check + insert run under this per-slot mutex. Other
    // transitions never increase occupancy, so they skip it.
    slot_locks: DashMap<(NaiveDate, String), Arc<Mutex<()>>>,
    // Serializes read-modify-write of a single record (status transitions
    // and deposit application), so a transition landing during a capture
    // cannot be overwritten.
    record_locks: DashMap<String, Arc<Mutex<()>>>,
    // order_id -> amounts fixed at initiation
    pending_orders: DashMap<String, DepositQuote>,
}

impl ReservationService {
    pub fn new(
        store: Arc<dyn ReservationRepository>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
        venue: VenueConfig,
        pricing: PricingConfig,
        staff_email: Option<String>,
    ) -> Self {
        Self {
            store,
            payments,
            notifier,
            slots: venue.slots,
            capacity: AtomicU32::new(venue.capacity_per_slot),
            pricing: RwLock::new(pricing),
            staff_email,
            slot_locks: DashMap::new(),
            record_locks: DashMap::new(),
            pending_orders: DashMap::new(),
        }
    }

    /// Configured slot labels, in display order.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Seats per slot currently in effect.
    pub fn capacity(&self) -> u32 {
        self.capacity.load(Ordering::SeqCst)
    }

    /// Staff: adjust seats per slot. Takes effect for subsequent bookings;
    /// existing reservations are never evicted.
    pub fn set_capacity(&self, capacity: u32) -> DomainResult<()> {
        if capacity < 1 {
            return Err(DomainError::Validation(
                "capacity must be at least 1".to_string(),
            ));
        }
        self.capacity.store(capacity, Ordering::SeqCst);
        info!("Venue capacity set to {} seats per slot", capacity);
        Ok(())
    }

    /// Staff: replace the pricing policy. Amounts already fixed for
    /// initiated or captured deposits are not recomputed.
    pub fn set_pricing(&self, pricing: PricingConfig) -> DomainResult<()> {
        if pricing.price_per_seat < 1 {
            return Err(DomainError::Validation(
                "price_per_seat must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&pricing.deposit_percent) {
            return Err(DomainError::Validation(
                "deposit_percent must be between 0 and 1".to_string(),
            ));
        }
        info!(
            "Pricing updated: {} per seat, {:.0}% deposit, minimum {}",
            pricing.price_per_seat,
            pricing.deposit_percent * 100.0,
            pricing.minimum_deposit
        );
        *self.pricing.write().unwrap_or_else(|e| e.into_inner()) = pricing;
        Ok(())
    }

    /// Estimated total and deposit for a party under current pricing.
    /// Deposit is rounded to the nearest minor unit and floored at the
    /// configured minimum.
    pub fn quote_for(&self, party_size: u32) -> Quote {
        let pricing = self.pricing.read().unwrap_or_else(|e| e.into_inner());
        let total = i64::from(party_size) * pricing.price_per_seat;
        let deposit = ((total as f64) * pricing.deposit_percent).round() as i64;
        Quote {
            total,
            deposit: deposit.max(pricing.minimum_deposit),
        }
    }

    /// Snapshot of the pricing policy currently in effect.
    pub fn pricing(&self) -> PricingConfig {
        self.pricing.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Configured ISO 4217 currency code.
    pub fn currency_code(&self) -> String {
        self.pricing
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .currency
            .clone()
    }

    // ── Booking ────────────────────────────────────────────────

    /// Create a reservation in `pending`, or reject it without any side
    /// effect when validation or the capacity check fails.
    pub async fn create(&self, request: BookingRequest) -> DomainResult<Reservation> {
        self.validate(&request)?;

        let lock = self.slot_lock(request.date, &request.time);
        let _guard = lock.lock().await;

        let day = self.store.find_by_date(request.date).await?;
        let capacity = self.capacity();
        if !capacity::can_fit(&day, request.date, &request.time, request.party_size, capacity) {
            return Err(DomainError::CapacityExceeded {
                date: request.date.to_string(),
                time: request.time.clone(),
                requested: request.party_size,
                remaining: capacity::remaining(&day, request.date, &request.time, capacity),
            });
        }

        let reservation = Reservation::new(
            request.name.trim(),
            request.phone.trim(),
            request.email.trim(),
            request
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            request.party_size,
            request.date,
            request.time.clone(),
        );
        self.store.save(reservation.clone()).await?;
        drop(_guard);
        drop(lock);
        self.prune_slot_locks(chrono::Utc::now().date_naive());

        info!(
            "Reservation {} created: {} x{} on {} {}",
            reservation.id, reservation.name, reservation.party_size, reservation.date,
            reservation.time
        );
        let (subject, html) = notifications::reservation_created(&reservation);
        self.spawn_notify(subject, html);
        Ok(reservation)
    }

    fn validate(&self, request: &BookingRequest) -> DomainResult<()> {
        if request.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".to_string()));
        }
        let phone = request.phone.trim();
        if phone.len() < 7
            || !phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | ' '))
        {
            return Err(DomainError::Validation(
                "enter a valid phone number".to_string(),
            ));
        }
        let email = request.email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(user, host)| !user.is_empty() && host.contains('.'))
            .unwrap_or(false);
        if !valid_email {
            return Err(DomainError::Validation(
                "enter a valid email address".to_string(),
            ));
        }
        if request.party_size < 1 {
            return Err(DomainError::Validation(
                "party size must be at least 1".to_string(),
            ));
        }
        if request.party_size > MAX_PARTY_SIZE {
            return Err(DomainError::Validation(format!(
                "party size cannot exceed {}",
                MAX_PARTY_SIZE
            )));
        }
        if !self.slots.iter().any(|s| s == &request.time) {
            return Err(DomainError::Validation(format!(
                "'{}' is not a bookable time slot",
                request.time
            )));
        }
        Ok(())
    }

    fn slot_lock(&self, date: NaiveDate, time: &str) -> Arc<Mutex<()>> {
        self.slot_locks
            .entry((date, time.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn record_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.record_locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop lock entries for days already in the past. Entries still held
    /// elsewhere are kept; they are released when the holder finishes.
    fn prune_slot_locks(&self, today: NaiveDate) {
        self.slot_locks
            .retain(|(date, _), lock| *date >= today || Arc::strong_count(lock) > 1);
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get(&self, id: &str) -> DomainResult<Reservation> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    /// Reservations for a day, ordered by slot then newest first.
    pub async fn list_for_day(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        let mut day = self.store.find_by_date(date).await?;
        day.sort_by(|a, b| {
            a.time
                .cmp(&b.time)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(day)
    }

    /// Per-slot used/remaining seats for a day.
    pub async fn availability(&self, date: NaiveDate) -> DomainResult<Vec<SlotAvailability>> {
        let day = self.store.find_by_date(date).await?;
        let capacity = self.capacity();
        Ok(capacity::usage_by_slot(&day, date, &self.slots)
            .into_iter()
            .map(|(time, used)| SlotAvailability {
                remaining: capacity.saturating_sub(used),
                time,
                used,
                capacity,
            })
            .collect())
    }

    // ── Transitions ────────────────────────────────────────────

    /// Guest asks to cancel (allowed from `pending` or `confirmed`).
    pub async fn request_cancel(&self, id: &str) -> DomainResult<Reservation> {
        self.transition(id, "cancel_requested", Reservation::request_cancel)
            .await
    }

    /// Staff confirms a pending reservation.
    pub async fn confirm(&self, id: &str) -> DomainResult<Reservation> {
        self.transition(id, "confirmed", Reservation::confirm).await
    }

    /// Staff approves a requested cancellation, freeing the seats.
    pub async fn approve_cancel(&self, id: &str) -> DomainResult<Reservation> {
        let reservation = self
            .transition(id, "cancelled", Reservation::approve_cancel)
            .await?;
        // outstanding deposit orders are unusable once cancelled
        self.pending_orders
            .retain(|_, quote| quote.reservation_id != reservation.id);
        Ok(reservation)
    }

    async fn transition(
        &self,
        id: &str,
        target: &str,
        apply: impl FnOnce(&mut Reservation) -> DomainResult<()>,
    ) -> DomainResult<Reservation> {
        let lock = self.record_lock(id);
        let _guard = lock.lock().await;
        let mut reservation = self.get(id).await?;
        apply(&mut reservation)?;
        self.store.update(reservation.clone()).await?;
        info!("Reservation {} -> {}", id, target);
        Ok(reservation)
    }

    // ── Deposit flow ───────────────────────────────────────────

    /// Create an external payment order for the reservation's deposit.
    ///
    /// The quoted amounts are fixed against the returned order id; a later
    /// pricing change does not alter them. The reservation itself is not
    /// mutated.
    pub async fn initiate_deposit(&self, id: &str) -> DomainResult<DepositOrder> {
        let reservation = self.get(id).await?;
        if reservation.status == ReservationStatus::Cancelled || reservation.deposit_paid {
            return Err(DomainError::InvalidState {
                action: "initiate a deposit for",
                status: reservation.status,
            });
        }

        let quote = self.quote_for(reservation.party_size);
        let currency = self.currency_code();
        let description = format!("Deposit for reservation {}", reservation.id);
        let order_id = self
            .payments
            .create_order(quote.deposit, &currency, &description)
            .await
            .map_err(DomainError::Payment)?;

        self.pending_orders.insert(
            order_id.clone(),
            DepositQuote {
                reservation_id: reservation.id.clone(),
                deposit: quote.deposit,
                total: quote.total,
            },
        );
        info!(
            "Deposit order {} created for reservation {} ({} {})",
            order_id, reservation.id, quote.deposit, currency
        );
        Ok(DepositOrder {
            order_id,
            deposit: quote.deposit,
            total: quote.total,
            currency,
        })
    }

    /// Capture a deposit order and apply the payment transition.
    ///
    /// Idempotent: a reservation that already has a captured deposit is
    /// returned as-is, with no second capture and no second notification.
    /// On capture failure the reservation is left unchanged; `Declined`
    /// and `PayerActionRequired` invite the caller to restart the flow.
    pub async fn complete_deposit(&self, id: &str, order_id: &str) -> DomainResult<Reservation> {
        let reservation = self.get(id).await?;
        if reservation.deposit_paid {
            debug!(
                "Reservation {} already paid (ref {:?}); capture of {} is a no-op",
                reservation.id, reservation.payment_reference, order_id
            );
            return Ok(reservation);
        }
        if reservation.status == ReservationStatus::Cancelled {
            return Err(DomainError::InvalidState {
                action: "pay a deposit for",
                status: reservation.status,
            });
        }

        let capture = self
            .payments
            .capture_order(order_id)
            .await
            .map_err(DomainError::Payment)?;

        // Amounts fixed at initiation; fall back to a fresh quote when the
        // order predates this process (e.g. restart between initiate and
        // capture).
        let (deposit, total) = match self.pending_orders.remove(order_id) {
            Some((_, quote)) if quote.reservation_id == reservation.id => {
                (quote.deposit, quote.total)
            }
            _ => {
                let quote = self.quote_for(reservation.party_size);
                (quote.deposit, quote.total)
            }
        };

        // The gateway call is not covered by the record lock, so the record
        // may have moved while the capture was in flight. Re-read and apply
        // under the lock; a cancellation that landed meanwhile wins.
        let lock = self.record_lock(id);
        let _guard = lock.lock().await;
        let mut current = self.get(id).await?;
        if current.deposit_paid {
            debug!(
                "Reservation {} paid by a competing capture (ref {:?}); {} is a no-op",
                current.id, current.payment_reference, capture.capture_id
            );
            return Ok(current);
        }
        if let Err(e) = current.apply_deposit_capture(deposit, total, capture.capture_id.clone()) {
            warn!(
                "Captured payment {} for reservation {} cannot be applied ({}); manual refund required",
                capture.capture_id, current.id, e
            );
            return Err(e);
        }
        self.store.update(current.clone()).await?;
        // competing orders for this reservation are no longer payable
        self.pending_orders
            .retain(|_, quote| quote.reservation_id != current.id);
        info!(
            "Reservation {} deposit captured ({} of {}), ref {}",
            current.id, deposit, total, capture.capture_id
        );
        let (subject, html) = notifications::deposit_paid(&current, &capture, deposit, total);
        self.spawn_notify(subject, html);
        Ok(current)
    }

    // ── Notifications ──────────────────────────────────────────

    fn spawn_notify(&self, subject: String, html: String) {
        let Some(recipient) = self.staff_email.clone() else {
            debug!("staff_email not configured; skipping notification '{}'", subject);
            return;
        };
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&recipient, &subject, &html).await {
                warn!("Failed to send notification '{}': {}", subject, e);
            }
        });
    }
}

// ── Tests ──────────────────────────────────────────────────────
