use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Shown when an account has not uploaded a profile picture yet.
pub const PLACEHOLDER_AVATAR: &str = "https://cdn-icons-png.flaticon.com/512/847/847969.png";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileDetails {
    pub id: Uuid,
    pub account_id: Uuid,
    pub email: Option<String>,
    pub profile_image: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// API-facing profile shape: always fully populated, with the stored image
/// filename resolved to an absolute URL (or the placeholder avatar).
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub email: String,
    pub profile_image: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
}

impl ProfileView {
    pub fn from_details(details: Option<&ProfileDetails>, image_base: &str) -> Self {
        let image = details
            .and_then(|d| d.profile_image.as_deref())
            .map(|file| format!("{image_base}/{file}"))
            .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string());

        Self {
            email: details
                .and_then(|d| d.email.clone())
                .unwrap_or_default(),
            profile_image: image,
            date_of_birth: details.and_then(|d| d.date_of_birth),
            address: details
                .and_then(|d| d.address.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_details_fall_back_to_defaults() {
        let view = ProfileView::from_details(None, "http://localhost:5000/uploads/profile_pictures");
        assert_eq!(view.email, "");
        assert_eq!(view.address, "");
        assert_eq!(view.profile_image, PLACEHOLDER_AVATAR);
        assert!(view.date_of_birth.is_none());
    }

    #[test]
    fn test_stored_image_resolves_to_absolute_url() {
        let details = ProfileDetails {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            email: Some("nimal@example.com".to_string()),
            profile_image: Some("3f2b.png".to_string()),
            date_of_birth: None,
            address: Some("Colombo".to_string()),
            created_at: Utc::now(),
        };

        let view = ProfileView::from_details(
            Some(&details),
            "http://localhost:5000/uploads/profile_pictures",
        );
        assert_eq!(
            view.profile_image,
            "http://localhost:5000/uploads/profile_pictures/3f2b.png"
        );
        assert_eq!(view.email, "nimal@example.com");
    }
}
