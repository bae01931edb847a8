//! Registration, login, logout, dashboard and password changes. One generic
//! implementation serves both account namespaces; the thin wrappers below
//! pin the role for the router.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{password, token, AuthContext};
use crate::models::{Account, Role};
use crate::state::AppState;
use crate::store::accounts;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn register_admin(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Response, AppError> {
    register(state, Role::Admin, payload).await
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Response, AppError> {
    register(state, Role::User, payload).await
}

pub async fn login_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, AppError> {
    login(state, Role::Admin, jar, payload).await
}

pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, AppError> {
    login(state, Role::User, jar, payload).await
}

pub async fn logout_admin(State(state): State<AppState>, jar: CookieJar) -> Response {
    logout(state, jar)
}

pub async fn logout_user(State(state): State<AppState>, jar: CookieJar) -> Response {
    logout(state, jar)
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    dashboard(state, Role::Admin, auth).await
}

pub async fn user_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, AppError> {
    dashboard(state, Role::User, auth).await
}

pub async fn change_password_admin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Response, AppError> {
    change_password(state, Role::Admin, auth, payload).await
}

pub async fn change_password_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Response, AppError> {
    change_password(state, Role::User, auth, payload).await
}

async fn register(
    state: AppState,
    role: Role,
    payload: RegisterPayload,
) -> Result<Response, AppError> {
    let RegisterPayload {
        first_name,
        last_name,
        mobile,
        password,
    } = payload;

    for (name, value) in [
        ("first_name", &first_name),
        ("last_name", &last_name),
        ("mobile", &mobile),
        ("password", &password),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{name} is required")));
        }
    }

    if accounts::find_by_mobile(&state.pool, role, &mobile)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "{} already exists",
            role.display_name()
        )));
    }

    let hash = password::hash_password(&password, state.config.argon2_time_cost)?;
    let account = accounts::insert(
        &state.pool,
        role,
        first_name.trim(),
        last_name.trim(),
        mobile.trim(),
        &hash,
    )
    .await?;

    Ok(created(
        keyed(role, &account)?,
        format!("{} registered successfully", role.display_name()),
    ))
}

async fn login(
    state: AppState,
    role: Role,
    jar: CookieJar,
    payload: LoginPayload,
) -> Result<Response, AppError> {
    // Unknown mobile and wrong password take the same exit.
    let account = accounts::find_by_mobile(&state.pool, role, &payload.mobile)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&payload.password, &account.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let session = token::issue(&state.config.jwt_secret, account.id, role)?;
    let jar = jar.add(token::session_cookie(
        session.clone(),
        state.config.secure_cookies,
    ));

    // The token rides in both the cookie and the body; header-based clients
    // store it themselves.
    let mut data = serde_json::Map::new();
    data.insert("token".to_string(), Value::String(session));
    data.insert(role.as_str().to_string(), to_json(&account)?);

    Ok((jar, success(Value::Object(data), "Login successful")).into_response())
}

fn logout(state: AppState, jar: CookieJar) -> Response {
    let jar = jar.add(token::clear_session_cookie(state.config.secure_cookies));
    (jar, empty_success("Logged out successfully")).into_response()
}

async fn dashboard(state: AppState, role: Role, auth: AuthContext) -> Result<Response, AppError> {
    let account = accounts::find_by_id(&state.pool, role, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", role.display_name())))?;

    Ok(success(
        keyed(role, &account)?,
        format!("{} fetched successfully", role.display_name()),
    ))
}

async fn change_password(
    state: AppState,
    role: Role,
    auth: AuthContext,
    payload: ChangePasswordPayload,
) -> Result<Response, AppError> {
    let ChangePasswordPayload {
        old_password,
        new_password,
        confirm_password,
    } = payload;

    if old_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if new_password != confirm_password {
        return Err(AppError::Validation(
            "New password and confirm password do not match".to_string(),
        ));
    }

    let account = accounts::find_by_id(&state.pool, role, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", role.display_name())))?;

    if !password::verify_password(&old_password, &account.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let hash = password::hash_password(&new_password, state.config.argon2_time_cost)?;
    accounts::update_password_hash(&state.pool, role, auth.id, &hash).await?;

    Ok(empty_success("Password changed successfully"))
}

/// `{"admin": ...}` or `{"user": ...}` depending on the namespace.
fn keyed(role: Role, account: &Account) -> Result<Value, AppError> {
    let mut map = serde_json::Map::new();
    map.insert(role.as_str().to_string(), to_json(account)?);
    Ok(Value::Object(map))
}

fn to_json(account: &Account) -> Result<Value, AppError> {
    serde_json::to_value(account)
        .map_err(|e| AppError::Internal(format!("Failed to serialize account: {e}")))
}
