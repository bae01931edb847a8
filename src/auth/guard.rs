use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::token;
use crate::models::Role;
use crate::utils::error::AppError;

/// Identity attached to the request once the session token checks out.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub id: Uuid,
    pub role: Role,
}

/// Gate for admin-only routes.
pub fn require_admin(secret: &str) -> RequireRoleLayer {
    RequireRoleLayer::new(Role::Admin, secret)
}

/// Gate for user-only routes.
pub fn require_user(secret: &str) -> RequireRoleLayer {
    RequireRoleLayer::new(Role::User, secret)
}

#[derive(Clone)]
pub struct RequireRoleLayer {
    role: Role,
    secret: Arc<str>,
}

impl RequireRoleLayer {
    fn new(role: Role, secret: &str) -> Self {
        Self {
            role,
            secret: Arc::from(secret),
        }
    }
}

impl<S> Layer<S> for RequireRoleLayer {
    type Service = RequireRoleService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRoleService {
            inner,
            role: self.role,
            secret: self.secret.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RequireRoleService<S> {
    inner: S,
    role: Role,
    secret: Arc<str>,
}

impl<S> Service<Request<Body>> for RequireRoleService<S>
where
    S: Service<Request<Body>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = RequireRoleFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let claims = extract_token(request.headers())
            .and_then(|raw| token::verify(&self.secret, &raw).ok());

        match claims {
            Some(claims) if claims.role == self.role => {
                request.extensions_mut().insert(AuthContext {
                    id: claims.sub,
                    role: claims.role,
                });
                RequireRoleFuture::Inner {
                    future: self.inner.call(request),
                }
            }
            // Missing, invalid, expired or role-mismatched: short-circuit
            // before any handler work happens.
            _ => RequireRoleFuture::Reject {
                response: Some(
                    AppError::Unauthorized("Authentication required".to_string()).into_response(),
                ),
            },
        }
    }
}

/// `Authorization: Bearer` is checked first, then the session cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == token::SESSION_COOKIE).then(|| value.to_string())
    })
}

#[pin_project::pin_project(project = RequireRoleFutureProj)]
pub enum RequireRoleFuture<F> {
    Inner {
        #[pin]
        future: F,
    },
    Reject {
        response: Option<Response>,
    },
}

impl<F, E> std::future::Future for RequireRoleFuture<F>
where
    F: std::future::Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            RequireRoleFutureProj::Inner { future } => future.poll(cx),
            RequireRoleFutureProj::Reject { response } => Poll::Ready(Ok(response
                .take()
                .expect("RequireRoleFuture polled after completion"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    const SECRET: &str = "guard-secret";

    async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
        auth.id.to_string()
    }

    fn guarded_app(layer: RequireRoleLayer) -> Router {
        Router::new().route("/protected", get(whoami)).route_layer(layer)
    }

    fn get_request(token: Option<&str>, via_cookie: bool) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(token) = token {
            builder = if via_cookie {
                builder.header(header::COOKIE, format!("token={token}"))
            } else {
                builder.header(header::AUTHORIZATION, format!("Bearer {token}"))
            };
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = guarded_app(require_user(SECRET));
        let response = app.oneshot(get_request(None, false)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let app = guarded_app(require_user(SECRET));
        let response = app
            .oneshot(get_request(Some("not-a-token"), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_bearer_token_passes_and_attaches_identity() {
        let id = Uuid::new_v4();
        let token = token::issue(SECRET, id, Role::User).unwrap();
        let app = guarded_app(require_user(SECRET));

        let response = app
            .oneshot(get_request(Some(&token), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(body, id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_valid_cookie_token_passes() {
        let token = token::issue(SECRET, Uuid::new_v4(), Role::Admin).unwrap();
        let app = guarded_app(require_admin(SECRET));

        let response = app.oneshot(get_request(Some(&token), true)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_role_mismatch_is_unauthorized() {
        let token = token::issue(SECRET, Uuid::new_v4(), Role::User).unwrap();
        let app = guarded_app(require_admin(SECRET));

        let response = app
            .oneshot(get_request(Some(&token), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let expired = chrono::Utc::now().timestamp() - token::SESSION_TTL_SECS;
        let token =
            token::issue_with_expiry(SECRET, Uuid::new_v4(), Role::User, expired).unwrap();
        let app = guarded_app(require_user(SECRET));

        let response = app
            .oneshot(get_request(Some(&token), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
