use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which of the two disjoint account namespaces a request is acting on.
///
/// Admins and users are structurally identical but live in separate tables,
/// so one module handles both with the role selecting the table pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    pub fn accounts_table(&self) -> &'static str {
        match self {
            Role::Admin => "admins",
            Role::User => "users",
        }
    }

    pub fn details_table(&self) -> &'static str {
        match self {
            Role::Admin => "admin_details",
            Role::User => "user_details",
        }
    }

    /// Multipart field name carrying this role's profile image.
    pub fn image_field(&self) -> &'static str {
        match self {
            Role::Admin => "admin_profile_image",
            Role::User => "profile_image",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            first_name: "Nimal".to_string(),
            last_name: "Perera".to_string(),
            mobile: "0711111111".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(sample_account()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("mobile").is_some());
    }

    #[test]
    fn test_role_table_names_are_disjoint() {
        assert_ne!(Role::Admin.accounts_table(), Role::User.accounts_table());
        assert_ne!(Role::Admin.details_table(), Role::User.details_table());
    }

    #[test]
    fn test_role_round_trips_through_serde() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
