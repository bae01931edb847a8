use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub venue: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Event with the stored image filename resolved to an absolute URL.
#[derive(Debug, Serialize)]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub venue: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn into_view(self, image_base: &str) -> EventView {
        let image = self.image.map(|file| format!("{image_base}/{file}"));
        EventView {
            id: self.id,
            title: self.title,
            date: self.date,
            venue: self.venue,
            price: self.price,
            image,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_view_qualifies_the_image() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Tech Expo".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            venue: "BMICH".to_string(),
            price: Decimal::new(150000, 2),
            image: Some("9acd.jpg".to_string()),
            created_at: Utc::now(),
        };

        let view = event.into_view("http://localhost:5000/uploads/event_images");
        assert_eq!(
            view.image.as_deref(),
            Some("http://localhost:5000/uploads/event_images/9acd.jpg")
        );
    }

    #[test]
    fn test_into_view_keeps_missing_image_null() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Open Mic".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            venue: "Town Hall".to_string(),
            price: Decimal::ZERO,
            image: None,
            created_at: Utc::now(),
        };

        assert!(event.into_view("http://localhost").image.is_none());
    }
}
