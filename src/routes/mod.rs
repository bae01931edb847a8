use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_user};
use crate::config::create_cors_layer;
use crate::handlers::{self, auth, bookings, events, otp, profile, users};
use crate::state::AppState;
use crate::upload::MAX_IMAGE_BYTES;

/// Room for a 5 MiB image plus the rest of the multipart form.
const MAX_REQUEST_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

pub fn create_routes(state: AppState) -> Router {
    let admin_guard = require_admin(&state.config.jwt_secret);
    let user_guard = require_user(&state.config.jwt_secret);

    let admin_routes = Router::new()
        .route("/register", post(auth::register_admin))
        .route("/login", post(auth::login_admin))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout_admin))
                .route("/dashboard", get(auth::admin_dashboard))
                .route("/users", get(users::list_users).post(users::add_user))
                .route(
                    "/users/:id",
                    put(users::update_user).delete(users::delete_user),
                )
                .route("/change-password", put(auth::change_password_admin))
                .route_layer(admin_guard.clone()),
        );

    let user_routes = Router::new()
        .route("/register", post(auth::register_user))
        .route("/login", post(auth::login_user))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout_user))
                .route("/dashboard", get(auth::user_dashboard))
                .route("/change-password", put(auth::change_password_user))
                .route_layer(user_guard.clone()),
        );

    let admin_details_routes = Router::new()
        .route("/", get(profile::get_admin_profile))
        .route("/update", put(profile::update_admin_profile))
        .route("/delete", delete(profile::delete_admin_profile))
        .route_layer(admin_guard.clone());

    let user_details_routes = Router::new()
        .route("/", get(profile::get_user_profile))
        .route("/update", put(profile::update_user_profile))
        .route("/delete", delete(profile::delete_user_profile))
        .route_layer(user_guard.clone());

    // Listing is public; every write goes through the admin guard.
    let event_routes = Router::new()
        .route(
            "/",
            get(events::list_events)
                .merge(post(events::create_event).route_layer(admin_guard.clone())),
        )
        .route(
            "/:id",
            put(events::update_event)
                .delete(events::delete_event)
                .route_layer(admin_guard.clone()),
        );

    let booking_routes = Router::new()
        .merge(
            Router::new()
                .route("/ticket", post(bookings::book_ticket))
                .route("/my", get(bookings::my_bookings))
                .route("/:id", delete(bookings::cancel_booking))
                .route_layer(user_guard.clone()),
        )
        .merge(
            Router::new()
                .route("/all", get(bookings::all_bookings))
                .route_layer(admin_guard.clone()),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/admin", admin_routes)
        .nest("/api/user", user_routes)
        .nest("/api/admin-details", admin_details_routes)
        .nest("/api/user-details", user_details_routes)
        .nest("/api/events", event_routes)
        .nest("/api/bookings", booking_routes)
        .route("/api/send-otp", post(otp::send_otp))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SmsSettings};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        // connect_lazy performs no IO, so the router can be built without a
        // running database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/gatepass_test")
            .unwrap();
        let config = Config {
            database_url: "postgres://localhost/gatepass_test".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            public_base_url: "http://localhost:5000".to_string(),
            upload_dir: std::env::temp_dir(),
            secure_cookies: false,
            argon2_time_cost: 2,
            sms: SmsSettings {
                endpoint: "http://localhost:1/sms".to_string(),
                username: String::new(),
                password: String::new(),
                alias: "TEST".to_string(),
            },
        };
        AppState::new(pool, config)
    }

    #[tokio::test]
    async fn test_health_endpoint_responds() {
        let app = create_routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_session() {
        let app = create_routes(test_state());

        for (method, uri) in [
            ("GET", "/api/bookings/my"),
            ("GET", "/api/bookings/all"),
            ("POST", "/api/bookings/ticket"),
            ("GET", "/api/admin/dashboard"),
            ("GET", "/api/user-details"),
            ("POST", "/api/events"),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri} should be guarded"
            );
        }
    }

    #[tokio::test]
    async fn test_event_listing_is_public() {
        // No token: the request reaches the handler (which then fails on
        // the lazy pool with a database error, not a 401).
        let app = create_routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
