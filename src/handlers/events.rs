//! Event catalog: public listing, admin-only writes. Create and update
//! accept multipart forms with an optional `event_image` file.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, State};
use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::models::event::EventView;
use crate::state::AppState;
use crate::store::events;
use crate::upload::{self, UploadKind};
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let image_base = UploadKind::EventImage.public_base(&state.config.public_base_url);
    let events: Vec<EventView> = events::list(&state.pool)
        .await?
        .into_iter()
        .map(|event| event.into_view(&image_base))
        .collect();

    Ok(success(json!({ "events": events }), "Events fetched successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (fields, image) = upload::collect_form(&mut multipart, "event_image").await?;

    let title = require_field(&fields, "title")?.to_string();
    let venue = require_field(&fields, "venue")?.to_string();
    let date = parse_date(require_field(&fields, "date")?)?;
    let price = parse_price(require_field(&fields, "price")?)?;

    let stored_image = match image {
        Some(upload) => Some(
            upload::store(&state.config.upload_dir, UploadKind::EventImage, &upload).await?,
        ),
        None => None,
    };

    let event = events::insert(
        &state.pool,
        &title,
        date,
        &venue,
        price,
        stored_image.as_deref(),
    )
    .await?;

    let image_base = UploadKind::EventImage.public_base(&state.config.public_base_url);
    Ok(created(
        json!({ "event": event.into_view(&image_base) }),
        "Event created successfully",
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (fields, image) = upload::collect_form(&mut multipart, "event_image").await?;

    let existing = events::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let title = optional_field(&fields, "title");
    let venue = optional_field(&fields, "venue");
    let date = optional_field(&fields, "date")
        .map(|raw| parse_date(&raw))
        .transpose()?;
    let price = optional_field(&fields, "price")
        .map(|raw| parse_price(&raw))
        .transpose()?;

    // Omitting the image leaves the current one in place.
    let stored_image = match image {
        Some(upload) => Some(
            upload::store(&state.config.upload_dir, UploadKind::EventImage, &upload).await?,
        ),
        None => None,
    };

    let event = events::update(
        &state.pool,
        id,
        title.as_deref(),
        date,
        venue.as_deref(),
        price,
        stored_image.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if stored_image.is_some() {
        if let Some(old) = existing.image {
            upload::remove(&state.config.upload_dir, UploadKind::EventImage, &old).await;
        }
    }

    let image_base = UploadKind::EventImage.public_base(&state.config.public_base_url);
    Ok(success(
        json!({ "event": event.into_view(&image_base) }),
        "Event updated successfully",
    ))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    // Dependent bookings cascade away with the event.
    let image = events::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if let Some(file) = image {
        upload::remove(&state.config.upload_dir, UploadKind::EventImage, &file).await;
    }

    Ok(empty_success("Event deleted successfully"))
}

fn require_field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str, AppError> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional_field(fields: &HashMap<String, String>, name: &str) -> Option<String> {
    fields
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be YYYY-MM-DD".to_string()))
}

fn parse_price(raw: &str) -> Result<Decimal, AppError> {
    let price: Decimal = raw
        .parse()
        .map_err(|_| AppError::Validation("price must be a decimal number".to_string()))?;
    if price < Decimal::ZERO {
        return Err(AppError::Validation(
            "price must be non-negative".to_string(),
        ));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_accepts_currency_values() {
        assert_eq!(parse_price("2500.00").unwrap(), Decimal::new(250000, 2));
        assert_eq!(parse_price("0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_rejects_negative_and_garbage() {
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
    }

    #[test]
    fn test_parse_date_validates_format() {
        assert!(parse_date("2026-09-12").is_ok());
        assert!(parse_date("12/09/2026").is_err());
    }

    #[test]
    fn test_required_and_optional_field_handling() {
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), "  Tech Expo ".to_string());
        fields.insert("venue".to_string(), "   ".to_string());

        assert_eq!(require_field(&fields, "title").unwrap(), "Tech Expo");
        assert!(require_field(&fields, "venue").is_err());
        assert!(require_field(&fields, "price").is_err());
        assert!(optional_field(&fields, "venue").is_none());
        assert_eq!(optional_field(&fields, "title").as_deref(), Some("Tech Expo"));
    }
}
