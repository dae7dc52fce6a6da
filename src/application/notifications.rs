//! Staff notification content
//!
//! Subjects and HTML bodies for the two lifecycle transition points that
//! notify staff: reservation creation and deposit capture.

use crate::application::ports::Capture;
use crate::domain::Reservation;

/// Format minor currency units for display ("400" -> "4.00").
pub fn format_amount(minor: i64) -> String {
    format!("{}.{:02}", minor / 100, (minor % 100).abs())
}

/// Email announcing a new reservation.
pub fn reservation_created(res: &Reservation) -> (String, String) {
    let subject = format!("New reservation: {} \u{2022} {} {}", res.name, res.date, res.time);
    let notes = res
        .notes
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| format!("<p><strong>Notes:</strong> {}</p>", n))
        .unwrap_or_default();
    let html = format!(
        "<h2>New Reservation</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Phone:</strong> {}</p>\
         <p><strong>Party:</strong> {}</p>\
         <p><strong>Date &amp; Time:</strong> {} {}</p>\
         {}",
        res.name, res.phone, res.party_size, res.date, res.time, notes
    );
    (subject, html)
}

/// Email announcing a captured deposit.
pub fn deposit_paid(
    res: &Reservation,
    capture: &Capture,
    deposit_minor: i64,
    total_minor: i64,
) -> (String, String) {
    let subject = format!(
        "Deposit paid \u{2022} {} \u{2022} {} {}",
        res.name, res.date, res.time
    );
    let payer = capture
        .payer_name
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p><strong>Payer:</strong> {}</p>", p))
        .unwrap_or_default();
    let html = format!(
        "<h2>Deposit Paid</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Party:</strong> {}</p>\
         <p><strong>Date &amp; Time:</strong> {} {}</p>\
         <p><strong>Deposit:</strong> ${} (of total ${})</p>\
         <p><strong>Capture ID:</strong> {}</p>\
         {}",
        res.name,
        res.party_size,
        res.date,
        res.time,
        format_amount(deposit_minor),
        format_amount(total_minor),
        capture.capture_id,
        payer
    );
    (subject, html)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Reservation {
        Reservation::new(
            "Ana",
            "09171234567",
            "a@b.com",
            Some("window seat".to_string()),
            4,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "18:00",
        )
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(400), "4.00");
        assert_eq!(format_amount(2000), "20.00");
        assert_eq!(format_amount(105), "1.05");
        assert_eq!(format_amount(100), "1.00");
    }

    #[test]
    fn creation_email_includes_contact_and_notes() {
        let (subject, html) = reservation_created(&sample());
        assert!(subject.contains("Ana"));
        assert!(subject.contains("18:00"));
        assert!(html.contains("09171234567"));
        assert!(html.contains("window seat"));
    }

    #[test]
    fn deposit_email_includes_amounts_and_capture_id() {
        let capture = Capture {
            capture_id: "CAP-7".to_string(),
            payer_name: Some("Ana Cruz".to_string()),
        };
        let (subject, html) = deposit_paid(&sample(), &capture, 400, 2000);
        assert!(subject.starts_with("Deposit paid"));
        assert!(html.contains("$4.00"));
        assert!(html.contains("$20.00"));
        assert!(html.contains("CAP-7"));
        assert!(html.contains("Ana Cruz"));
    }
}
