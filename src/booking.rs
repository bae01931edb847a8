//! Booking engine core: ticket count validation, price computation and the
//! plain-text ticket summary that gets QR-encoded onto the ticket.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::utils::error::AppError;

/// Decimal multiplication, so currency totals never pick up float drift.
pub fn total_price(price: Decimal, tickets_count: i32) -> Decimal {
    price * Decimal::from(tickets_count)
}

pub fn validate_tickets_count(tickets_count: i32) -> Result<(), AppError> {
    if tickets_count < 1 {
        return Err(AppError::Validation(
            "Ticket count must be at least 1.".to_string(),
        ));
    }
    Ok(())
}

/// Everything that ends up printed on the ticket.
pub struct TicketDetails<'a> {
    pub event_title: &'a str,
    pub event_date: NaiveDate,
    pub venue: &'a str,
    pub attendee_name: &'a str,
    pub mobile: &'a str,
    pub email: &'a str,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub booked_at: DateTime<Utc>,
}

/// Fixed-format summary embedded in the QR code. Scanners at the gate show
/// this text verbatim.
pub fn render_ticket(ticket: &TicketDetails<'_>) -> String {
    format!(
        "\
━━━━━━━━━━━━━━━━━━━━━━
🎟️ EVENT TICKET SYSTEM
━━━━━━━━━━━━━━━━━━━━━━
🏛️  EVENT DETAILS
• Title: {title}
• Date: {date}
• Venue: {venue}

👤  ATTENDEE DETAILS
• Name: {name}
• Mobile: {mobile}
• Email: {email}

🎫  BOOKING INFO
• Tickets: {tickets}
• Total: Rs. {total}
• Booked On: {booked_on}

━━━━━━━━━━━━━━━━━━━━━━
✅  Verified Entry Ticket
Thank you for your purchase!
Enjoy the Event 🎉
━━━━━━━━━━━━━━━━━━━━━━
",
        title = ticket.event_title,
        date = ticket.event_date,
        venue = ticket.venue,
        name = ticket.attendee_name,
        mobile = ticket.mobile,
        email = ticket.email,
        tickets = ticket.tickets_count,
        total = ticket.total_price,
        booked_on = ticket.booked_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_total_price_is_exact() {
        assert_eq!(total_price(dec("2500.00"), 2), dec("5000.00"));
        assert_eq!(total_price(dec("1500"), 3), dec("4500"));
        assert_eq!(total_price(dec("99.99"), 7), dec("699.93"));
    }

    #[test]
    fn test_total_price_of_free_event_is_zero() {
        assert_eq!(total_price(Decimal::ZERO, 10), Decimal::ZERO);
    }

    #[test]
    fn test_tickets_count_must_be_positive() {
        assert!(validate_tickets_count(1).is_ok());
        assert!(validate_tickets_count(25).is_ok());
        assert!(validate_tickets_count(0).is_err());
        assert!(validate_tickets_count(-3).is_err());
    }

    #[test]
    fn test_ticket_text_carries_every_field() {
        let booked_at = "2026-08-05T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let ticket = TicketDetails {
            event_title: "Tech Expo",
            event_date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            venue: "BMICH",
            attendee_name: "Nimal Perera",
            mobile: "0711111111",
            email: "nimal@example.com",
            tickets_count: 2,
            total_price: dec("5000.00"),
            booked_at,
        };

        let text = render_ticket(&ticket);
        assert!(text.contains("Title: Tech Expo"));
        assert!(text.contains("Date: 2026-09-12"));
        assert!(text.contains("Venue: BMICH"));
        assert!(text.contains("Name: Nimal Perera"));
        assert!(text.contains("Mobile: 0711111111"));
        assert!(text.contains("Email: nimal@example.com"));
        assert!(text.contains("Tickets: 2"));
        assert!(text.contains("Total: Rs. 5000.00"));
        assert!(text.contains("Booked On: 2026-08-05 10:30:00 UTC"));
    }
}
