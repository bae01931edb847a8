//! Profile details: fetch with defaults, multipart upsert with optional
//! image replacement, and deletion. Replacing or deleting a profile image
//! also removes the old file from disk.

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Extension;
use chrono::NaiveDate;
use serde_json::json;

use crate::auth::AuthContext;
use crate::models::profile::ProfileView;
use crate::models::Role;
use crate::state::AppState;
use crate::store::{accounts, profiles};
use crate::upload::{self, UploadKind};
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

pub async fn get_admin_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    get_profile(state, Role::Admin, auth).await
}

pub async fn get_user_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    get_profile(state, Role::User, auth).await
}

pub async fn update_admin_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    update_profile(state, Role::Admin, auth, multipart).await
}

pub async fn update_user_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    update_profile(state, Role::User, auth, multipart).await
}

pub async fn delete_admin_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    delete_profile(state, Role::Admin, auth).await
}

pub async fn delete_user_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    delete_profile(state, Role::User, auth).await
}

async fn get_profile(state: AppState, role: Role, auth: AuthContext) -> Result<Response, AppError> {
    let account = accounts::find_by_id(&state.pool, role, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", role.display_name())))?;
    let details = profiles::find_by_account(&state.pool, role, auth.id).await?;

    let image_base = UploadKind::for_profile(role).public_base(&state.config.public_base_url);
    let view = ProfileView::from_details(details.as_ref(), &image_base);

    Ok(success(
        keyed(
            role,
            json!({
                "id": account.id,
                "first_name": account.first_name,
                "last_name": account.last_name,
                "mobile": account.mobile,
                "details": view,
            }),
        ),
        format!("{} details fetched successfully", role.display_name()),
    ))
}

async fn update_profile(
    state: AppState,
    role: Role,
    auth: AuthContext,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (fields, image) = upload::collect_form(&mut multipart, role.image_field()).await?;

    let account = accounts::find_by_id(&state.pool, role, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", role.display_name())))?;

    let first_name = fields
        .get("first_name")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| account.first_name.clone());
    let last_name = fields
        .get("last_name")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| account.last_name.clone());
    accounts::update_names(&state.pool, role, auth.id, &first_name, &last_name).await?;

    let existing = profiles::find_by_account(&state.pool, role, auth.id).await?;
    let old_image = existing.as_ref().and_then(|d| d.profile_image.clone());

    // Absent fields keep their stored values; supplied fields replace them.
    let email = merge_field(&fields, "email", existing.as_ref().and_then(|d| d.email.clone()));
    let address = merge_field(
        &fields,
        "address",
        existing.as_ref().and_then(|d| d.address.clone()),
    );
    let date_of_birth = match fields.get("date_of_birth").map(|v| v.trim()) {
        Some("") => None,
        Some(raw) => Some(parse_date_of_birth(raw)?),
        None => existing.as_ref().and_then(|d| d.date_of_birth),
    };

    let kind = UploadKind::for_profile(role);
    let new_image = match image {
        Some(upload) => Some(upload::store(&state.config.upload_dir, kind, &upload).await?),
        None => None,
    };

    let details = profiles::upsert(
        &state.pool,
        role,
        auth.id,
        email.as_deref(),
        date_of_birth,
        address.as_deref(),
        new_image.as_deref(),
    )
    .await?;

    // The replaced file goes away only after the record points elsewhere.
    if new_image.is_some() {
        if let Some(old) = old_image {
            upload::remove(&state.config.upload_dir, kind, &old).await;
        }
    }

    let view = ProfileView::from_details(
        Some(&details),
        &kind.public_base(&state.config.public_base_url),
    );

    Ok(success(
        keyed(
            role,
            json!({
                "first_name": first_name,
                "last_name": last_name,
                "details": view,
            }),
        ),
        format!("{} details updated successfully", role.display_name()),
    ))
}

async fn delete_profile(
    state: AppState,
    role: Role,
    auth: AuthContext,
) -> Result<Response, AppError> {
    let details = profiles::delete(&state.pool, role, auth.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("{} details not found", role.display_name()))
        })?;

    if let Some(image) = details.profile_image {
        upload::remove(
            &state.config.upload_dir,
            UploadKind::for_profile(role),
            &image,
        )
        .await;
    }

    Ok(empty_success(format!(
        "{} details deleted successfully",
        role.display_name()
    )))
}

/// `{"admin": ...}` or `{"user": ...}` depending on the namespace.
fn keyed(role: Role, value: serde_json::Value) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(role.as_str().to_string(), value);
    serde_json::Value::Object(map)
}

fn merge_field(
    fields: &std::collections::HashMap<String, String>,
    name: &str,
    existing: Option<String>,
) -> Option<String> {
    match fields.get(name).map(|v| v.trim()) {
        Some("") => None,
        Some(value) => Some(value.to_string()),
        None => existing,
    }
}

fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date_of_birth must be YYYY-MM-DD".to_string()))
}
