//! Admin-side user management. Adding a user also dispatches a welcome SMS,
//! fire-and-forget: the HTTP response never waits on the gateway.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::password;
use crate::models::Role;
use crate::state::AppState;
use crate::store::accounts;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct AddUserPayload {
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserPayload {
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
}

pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let users = accounts::list(&state.pool, Role::User).await?;
    Ok(success(json!({ "users": users }), "Users fetched successfully"))
}

pub async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<AddUserPayload>,
) -> Result<Response, AppError> {
    let AddUserPayload {
        first_name,
        last_name,
        mobile,
        password,
    } = payload;

    if first_name.trim().is_empty()
        || last_name.trim().is_empty()
        || mobile.trim().is_empty()
        || password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if accounts::find_by_mobile(&state.pool, Role::User, &mobile)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let hash = password::hash_password(&password, state.config.argon2_time_cost)?;
    let account = accounts::insert(
        &state.pool,
        Role::User,
        first_name.trim(),
        last_name.trim(),
        mobile.trim(),
        &hash,
    )
    .await?;

    let message = format!(
        "Dear {} {}, you have been registered to the Event Ticketing System. \
         Please log in with mobile number {} and change your password after your first login.",
        account.first_name, account.last_name, account.mobile
    );
    let sms = state.sms.clone();
    let recipient = account.mobile.clone();
    tokio::spawn(async move {
        sms.send(&recipient, &message).await;
    });

    Ok(created(
        json!({ "user": account }),
        "User created successfully",
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Response, AppError> {
    let account = accounts::update_contact(
        &state.pool,
        Role::User,
        id,
        payload.first_name.trim(),
        payload.last_name.trim(),
        payload.mobile.trim(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(success(
        json!({ "user": account }),
        "User updated successfully",
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !accounts::delete(&state.pool, Role::User, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(empty_success("User deleted successfully"))
}
