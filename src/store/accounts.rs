//! Credential store queries, shared by both account namespaces. The role
//! picks the table; table names are compile-time constants, never request
//! input, so interpolating them into SQL is safe.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Account, Role};
use crate::utils::error::AppError;

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, mobile, password_hash, created_at";

pub async fn find_by_mobile(
    pool: &PgPool,
    role: Role,
    mobile: &str,
) -> Result<Option<Account>, AppError> {
    let sql = format!(
        "SELECT {ACCOUNT_COLUMNS} FROM {} WHERE mobile = $1",
        role.accounts_table()
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(mobile)
        .fetch_optional(pool)
        .await?;
    Ok(account)
}

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    role: Role,
    id: Uuid,
) -> Result<Option<Account>, AppError> {
    let sql = format!(
        "SELECT {ACCOUNT_COLUMNS} FROM {} WHERE id = $1",
        role.accounts_table()
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(account)
}

pub async fn insert(
    pool: &PgPool,
    role: Role,
    first_name: &str,
    last_name: &str,
    mobile: &str,
    password_hash: &str,
) -> Result<Account, AppError> {
    let sql = format!(
        "INSERT INTO {} (id, first_name, last_name, mobile, password_hash) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {ACCOUNT_COLUMNS}",
        role.accounts_table()
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(Uuid::new_v4())
        .bind(first_name)
        .bind(last_name)
        .bind(mobile)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
    Ok(account)
}

/// Admin user management: names and mobile are replaceable, credentials are
/// not touched here.
pub async fn update_contact(
    pool: &PgPool,
    role: Role,
    id: Uuid,
    first_name: &str,
    last_name: &str,
    mobile: &str,
) -> Result<Option<Account>, AppError> {
    let sql = format!(
        "UPDATE {} SET first_name = $2, last_name = $3, mobile = $4 \
         WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}",
        role.accounts_table()
    );
    let account = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(mobile)
        .fetch_optional(pool)
        .await?;
    Ok(account)
}

pub async fn update_names(
    pool: &PgPool,
    role: Role,
    id: Uuid,
    first_name: &str,
    last_name: &str,
) -> Result<(), AppError> {
    let sql = format!(
        "UPDATE {} SET first_name = $2, last_name = $3 WHERE id = $1",
        role.accounts_table()
    );
    sqlx::query(&sql)
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password_hash(
    pool: &PgPool,
    role: Role,
    id: Uuid,
    password_hash: &str,
) -> Result<(), AppError> {
    let sql = format!(
        "UPDATE {} SET password_hash = $2 WHERE id = $1",
        role.accounts_table()
    );
    sqlx::query(&sql)
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list(pool: &PgPool, role: Role) -> Result<Vec<Account>, AppError> {
    let sql = format!(
        "SELECT {ACCOUNT_COLUMNS} FROM {} ORDER BY created_at ASC",
        role.accounts_table()
    );
    let accounts = sqlx::query_as::<_, Account>(&sql).fetch_all(pool).await?;
    Ok(accounts)
}

/// Returns false when no such account existed. Details and bookings go with
/// it via cascade.
pub async fn delete(pool: &PgPool, role: Role, id: Uuid) -> Result<bool, AppError> {
    let sql = format!("DELETE FROM {} WHERE id = $1", role.accounts_table());
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
