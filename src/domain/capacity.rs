//! Capacity ledger
//!
//! Pure occupancy accounting over the current reservation set. No stored
//! state of its own: every answer is a function of the reservations passed
//! in, so callers decide how fresh the snapshot must be (the lifecycle
//! manager re-reads under a per-slot lock before booking).

use chrono::NaiveDate;

use super::reservation::Reservation;

/// Seats occupied in a slot: sum of `party_size` over non-cancelled
/// reservations matching `date` and `time`.
pub fn occupancy(reservations: &[Reservation], date: NaiveDate, time: &str) -> u32 {
    reservations
        .iter()
        .filter(|r| r.date == date && r.time == time && r.status.occupies_seats())
        .map(|r| r.party_size)
        .sum()
}

/// Seats left in a slot. Never negative, even if capacity was lowered
/// below current occupancy.
pub fn remaining(reservations: &[Reservation], date: NaiveDate, time: &str, capacity: u32) -> u32 {
    capacity.saturating_sub(occupancy(reservations, date, time))
}

/// Whether a party of `party_size` fits in the slot under `capacity`.
/// Widened arithmetic: the sum must not wrap for any `u32` party size.
pub fn can_fit(
    reservations: &[Reservation],
    date: NaiveDate,
    time: &str,
    party_size: u32,
    capacity: u32,
) -> bool {
    u64::from(occupancy(reservations, date, time)) + u64::from(party_size) <= u64::from(capacity)
}

/// Occupancy per configured slot for one day, in slot order.
pub fn usage_by_slot(
    reservations: &[Reservation],
    date: NaiveDate,
    slots: &[String],
) -> Vec<(String, u32)> {
    slots
        .iter()
        .map(|slot| (slot.clone(), occupancy(reservations, date, slot)))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn booking(party_size: u32, time: &str) -> Reservation {
        Reservation::new("Guest", "09171234567", "g@x.com", None, party_size, day(), time)
    }

    #[test]
    fn empty_slot_has_zero_occupancy() {
        assert_eq!(occupancy(&[], day(), "18:00"), 0);
        assert_eq!(remaining(&[], day(), "18:00", 40), 40);
    }

    #[test]
    fn occupancy_sums_matching_slot_only() {
        let set = vec![booking(2, "18:00"), booking(3, "18:00"), booking(4, "19:00")];
        assert_eq!(occupancy(&set, day(), "18:00"), 5);
        assert_eq!(occupancy(&set, day(), "19:00"), 4);
        assert_eq!(occupancy(&set, day(), "20:00"), 0);
    }

    #[test]
    fn cancelled_reservations_do_not_count() {
        let mut cancelled = booking(10, "18:00");
        cancelled.request_cancel().unwrap();
        cancelled.approve_cancel().unwrap();
        let set = vec![cancelled, booking(2, "18:00")];
        assert_eq!(occupancy(&set, day(), "18:00"), 2);
    }

    #[test]
    fn cancel_requested_still_counts() {
        let mut requested = booking(3, "18:00");
        requested.request_cancel().unwrap();
        assert_eq!(occupancy(&[requested], day(), "18:00"), 3);
    }

    #[test]
    fn other_dates_do_not_count() {
        let mut other_day = booking(5, "18:00");
        other_day.date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(occupancy(&[other_day], day(), "18:00"), 0);
    }

    #[test]
    fn remaining_never_negative() {
        let set = vec![booking(6, "18:00")];
        assert_eq!(remaining(&set, day(), "18:00", 4), 0);
    }

    #[test]
    fn can_fit_exactly_to_capacity() {
        let set = vec![booking(2, "18:00")];
        assert!(can_fit(&set, day(), "18:00", 2, 4));
        assert!(!can_fit(&set, day(), "18:00", 3, 4));
    }

    #[test]
    fn oversized_party_is_rejected_without_wrapping() {
        let set = vec![booking(5, "18:00")];
        assert!(!can_fit(&set, day(), "18:00", u32::MAX, 40));
        assert!(!can_fit(&[], day(), "18:00", u32::MAX, u32::MAX - 1));
        assert!(can_fit(&[], day(), "18:00", u32::MAX, u32::MAX));
    }

    #[test]
    fn capacity_two_scenario() {
        // capacity=2: party of 2 fills the slot, party of 1 is rejected,
        // cancelling the first frees the slot again
        let first = booking(2, "18:00");
        let set = vec![first.clone()];
        assert!(!can_fit(&set, day(), "18:00", 1, 2));

        let mut first = first;
        first.request_cancel().unwrap();
        first.approve_cancel().unwrap();
        let set = vec![first];
        assert_eq!(occupancy(&set, day(), "18:00"), 0);
        assert!(can_fit(&set, day(), "18:00", 1, 2));
    }

    #[test]
    fn usage_by_slot_keeps_slot_order() {
        let slots = vec!["17:00".to_string(), "18:00".to_string(), "19:00".to_string()];
        let set = vec![booking(2, "18:00"), booking(1, "17:00")];
        let usage = usage_by_slot(&set, day(), &slots);
        assert_eq!(
            usage,
            vec![
                ("17:00".to_string(), 1),
                ("18:00".to_string(), 2),
                ("19:00".to_string(), 0),
            ]
        );
    }
}
