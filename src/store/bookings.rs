//! Booking persistence. Inserts run on the same transaction that read the
//! event, so the price snapshot and the stored total cannot diverge.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::booking::{AdminBookingRow, UserBookingRow};
use crate::models::Booking;
use crate::utils::error::AppError;

const BOOKING_COLUMNS: &str =
    "id, event_id, user_id, tickets_count, total_price, qr_code, booking_date";

pub struct NewBooking<'a> {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub tickets_count: i32,
    pub total_price: Decimal,
    pub qr_code: &'a str,
    pub booking_date: DateTime<Utc>,
}

pub async fn insert<'e>(
    db: impl PgExecutor<'e>,
    booking: NewBooking<'_>,
) -> Result<Booking, AppError> {
    let sql = format!(
        "INSERT INTO bookings (id, event_id, user_id, tickets_count, total_price, qr_code, booking_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BOOKING_COLUMNS}"
    );
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(Uuid::new_v4())
        .bind(booking.event_id)
        .bind(booking.user_id)
        .bind(booking.tickets_count)
        .bind(booking.total_price)
        .bind(booking.qr_code)
        .bind(booking.booking_date)
        .fetch_one(db)
        .await?;
    Ok(booking)
}

/// The caller's bookings with their events, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserBookingRow>, AppError> {
    let rows = sqlx::query_as::<_, UserBookingRow>(
        "SELECT b.id, b.event_id, b.tickets_count, b.total_price, b.qr_code, b.booking_date, \
         e.title AS event_title, e.date AS event_date, e.venue AS event_venue, \
         e.price AS event_price, e.image AS event_image \
         FROM bookings b \
         JOIN events e ON e.id = b.event_id \
         WHERE b.user_id = $1 \
         ORDER BY b.booking_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every booking with user and event summaries, chronological, for the
/// admin view.
pub async fn list_all(pool: &PgPool) -> Result<Vec<AdminBookingRow>, AppError> {
    let rows = sqlx::query_as::<_, AdminBookingRow>(
        "SELECT b.id, b.event_id, b.user_id, b.tickets_count, b.total_price, b.booking_date, \
         e.title AS event_title, e.date AS event_date, e.venue AS event_venue, \
         u.first_name AS user_first_name, u.last_name AS user_last_name, u.mobile AS user_mobile \
         FROM bookings b \
         JOIN events e ON e.id = b.event_id \
         JOIN users u ON u.id = b.user_id \
         ORDER BY b.booking_date ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Deletes only when the booking belongs to the caller. A booking that does
/// not exist and a booking owned by someone else both come back false, so
/// the handler cannot leak which was the case.
pub async fn delete_owned(pool: &PgPool, user_id: Uuid, booking_id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND user_id = $2")
        .bind(booking_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
