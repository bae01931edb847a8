use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct SendOtpPayload {
    pub mobile: Option<String>,
    pub otp: Option<String>,
}

/// Delivers a caller-supplied OTP over the SMS gateway. Unlike the other
/// gateway uses this one reports delivery failure, since the OTP is the
/// whole point of the request.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendOtpPayload>,
) -> Result<Response, AppError> {
    let (Some(mobile), Some(otp)) = (payload.mobile, payload.otp) else {
        return Err(AppError::Validation(
            "Mobile number and OTP are required".to_string(),
        ));
    };

    let message = format!("Your OTP code is: {otp}");
    if state.sms.send(&mobile, &message).await {
        Ok(success(json!({ "sent": true }), "OTP sent successfully"))
    } else {
        Err(AppError::Internal("Failed to send OTP".to_string()))
    }
}
