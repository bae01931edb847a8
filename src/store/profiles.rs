//! Extended profile details, one optional row per account.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{ProfileDetails, Role};
use crate::utils::error::AppError;

const DETAIL_COLUMNS: &str =
    "id, account_id, email, profile_image, date_of_birth, address, created_at";

pub async fn find_by_account<'e>(
    db: impl PgExecutor<'e>,
    role: Role,
    account_id: Uuid,
) -> Result<Option<ProfileDetails>, AppError> {
    let sql = format!(
        "SELECT {DETAIL_COLUMNS} FROM {} WHERE account_id = $1",
        role.details_table()
    );
    let details = sqlx::query_as::<_, ProfileDetails>(&sql)
        .bind(account_id)
        .fetch_optional(db)
        .await?;
    Ok(details)
}

/// Creates the row on first write, updates it afterwards. The image column
/// is only touched when a new filename is supplied, mirroring upload-driven
/// replacement.
pub async fn upsert(
    pool: &PgPool,
    role: Role,
    account_id: Uuid,
    email: Option<&str>,
    date_of_birth: Option<NaiveDate>,
    address: Option<&str>,
    new_image: Option<&str>,
) -> Result<ProfileDetails, AppError> {
    let existing = find_by_account(pool, role, account_id).await?;

    let details = match existing {
        Some(_) => {
            let sql = format!(
                "UPDATE {} SET email = $2, date_of_birth = $3, address = $4, \
                 profile_image = COALESCE($5, profile_image) \
                 WHERE account_id = $1 RETURNING {DETAIL_COLUMNS}",
                role.details_table()
            );
            sqlx::query_as::<_, ProfileDetails>(&sql)
                .bind(account_id)
                .bind(email)
                .bind(date_of_birth)
                .bind(address)
                .bind(new_image)
                .fetch_one(pool)
                .await?
        }
        None => {
            let sql = format!(
                "INSERT INTO {} (id, account_id, email, profile_image, date_of_birth, address) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {DETAIL_COLUMNS}",
                role.details_table()
            );
            sqlx::query_as::<_, ProfileDetails>(&sql)
                .bind(Uuid::new_v4())
                .bind(account_id)
                .bind(email)
                .bind(new_image)
                .bind(date_of_birth)
                .bind(address)
                .fetch_one(pool)
                .await?
        }
    };

    Ok(details)
}

/// Deletes the row and hands back what was removed so the caller can clean
/// up the stored image file. None when no row existed.
pub async fn delete(
    pool: &PgPool,
    role: Role,
    account_id: Uuid,
) -> Result<Option<ProfileDetails>, AppError> {
    let sql = format!(
        "DELETE FROM {} WHERE account_id = $1 RETURNING {DETAIL_COLUMNS}",
        role.details_table()
    );
    let details = sqlx::query_as::<_, ProfileDetails>(&sql)
        .bind(account_id)
        .fetch_optional(pool)
        .await?;
    Ok(details)
}
