use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;
use crate::utils::error::AppError;

pub const SESSION_COOKIE: &str = "token";
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// Signed session payload: subject id, role, expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
}

/// Issues a session token valid for one hour.
pub fn issue(secret: &str, account_id: Uuid, role: Role) -> Result<String, AppError> {
    issue_with_expiry(secret, account_id, role, Utc::now().timestamp() + SESSION_TTL_SECS)
}

pub(crate) fn issue_with_expiry(
    secret: &str,
    account_id: Uuid,
    role: Role,
    exp: i64,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: account_id,
        role,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign session token: {e}")))
}

/// Verifies signature, shape and expiry. Every failure collapses into the
/// same `Unauthorized` so callers cannot tell why a token was rejected.
pub fn verify(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))
}

/// The login cookie: HTTP-only, strict same-site, one hour, secure outside
/// local development. The same token also goes into the response body for
/// clients that prefer the Authorization header.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS));
    cookie
}

/// Logout clears the cookie; bearer tokens stay valid until expiry since
/// sessions are stateless.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_preserves_identity() {
        let id = Uuid::new_v4();
        let token = issue(SECRET, id, Role::User).unwrap();
        let claims = verify(SECRET, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = Utc::now().timestamp() - SESSION_TTL_SECS;
        let token = issue_with_expiry(SECRET, Uuid::new_v4(), Role::User, expired).unwrap();
        assert!(verify(SECRET, &token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue(SECRET, Uuid::new_v4(), Role::Admin).unwrap();
        assert!(verify("another-secret", &token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify(SECRET, "not.a.jwt").is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(SESSION_TTL_SECS))
        );
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
