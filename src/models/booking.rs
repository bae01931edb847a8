use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub qr_code: String,
    pub booking_date: DateTime<Utc>,
}

/// A user's booking joined with its event, as returned by "my bookings".
#[derive(Debug, FromRow)]
pub struct UserBookingRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub qr_code: String,
    pub booking_date: DateTime<Utc>,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_venue: String,
    pub event_price: Decimal,
    pub event_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserBookingView {
    pub id: Uuid,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub qr_code: String,
    pub booking_date: DateTime<Utc>,
    pub event: EventSummary,
}

impl UserBookingRow {
    pub fn into_view(self, image_base: &str) -> UserBookingView {
        UserBookingView {
            id: self.id,
            tickets_count: self.tickets_count,
            total_price: self.total_price,
            qr_code: self.qr_code,
            booking_date: self.booking_date,
            event: EventSummary {
                id: self.event_id,
                title: self.event_title,
                date: self.event_date,
                venue: self.event_venue,
                price: Some(self.event_price),
                image: self
                    .event_image
                    .map(|file| format!("{image_base}/{file}")),
            },
        }
    }
}

/// A booking joined with both user and event, for the admin listing.
#[derive(Debug, FromRow)]
pub struct AdminBookingRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub booking_date: DateTime<Utc>,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_venue: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_mobile: String,
}

#[derive(Debug, Serialize)]
pub struct AttendeeSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
}

#[derive(Debug, Serialize)]
pub struct AdminBookingView {
    pub id: Uuid,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub booking_date: DateTime<Utc>,
    pub event: EventSummary,
    pub user: AttendeeSummary,
}

impl From<AdminBookingRow> for AdminBookingView {
    fn from(row: AdminBookingRow) -> Self {
        Self {
            id: row.id,
            tickets_count: row.tickets_count,
            total_price: row.total_price,
            booking_date: row.booking_date,
            event: EventSummary {
                id: row.event_id,
                title: row.event_title,
                date: row.event_date,
                venue: row.event_venue,
                price: None,
                image: None,
            },
            user: AttendeeSummary {
                id: row.user_id,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
                mobile: row.user_mobile,
            },
        }
    }
}
