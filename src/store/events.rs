//! Event catalog queries: publicly readable, admin-writable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Event;
use crate::utils::error::AppError;

const EVENT_COLUMNS: &str = "id, title, date, venue, price, image, created_at";

pub async fn list(pool: &PgPool) -> Result<Vec<Event>, AppError> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, created_at ASC");
    let events = sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?;
    Ok(events)
}

pub async fn find_by_id<'e>(db: impl PgExecutor<'e>, id: Uuid) -> Result<Option<Event>, AppError> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(event)
}

pub async fn insert(
    pool: &PgPool,
    title: &str,
    date: NaiveDate,
    venue: &str,
    price: Decimal,
    image: Option<&str>,
) -> Result<Event, AppError> {
    let sql = format!(
        "INSERT INTO events (id, title, date, venue, price, image) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {EVENT_COLUMNS}"
    );
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(date)
        .bind(venue)
        .bind(price)
        .bind(image)
        .fetch_one(pool)
        .await?;
    Ok(event)
}

/// Partial update: absent fields keep their stored values, including the
/// image, which is only replaced when a new upload supplies one.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    date: Option<NaiveDate>,
    venue: Option<&str>,
    price: Option<Decimal>,
    image: Option<&str>,
) -> Result<Option<Event>, AppError> {
    let sql = format!(
        "UPDATE events SET \
         title = COALESCE($2, title), \
         date = COALESCE($3, date), \
         venue = COALESCE($4, venue), \
         price = COALESCE($5, price), \
         image = COALESCE($6, image) \
         WHERE id = $1 RETURNING {EVENT_COLUMNS}"
    );
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .bind(title)
        .bind(date)
        .bind(venue)
        .bind(price)
        .bind(image)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

/// Deletes the event; dependent bookings cascade away with it. Returns the
/// removed row's image filename so the caller can delete the file.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Option<String>>, AppError> {
    let deleted = sqlx::query_scalar::<_, Option<String>>(
        "DELETE FROM events WHERE id = $1 RETURNING image",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(deleted)
}
