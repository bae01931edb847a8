use std::env;
use std::path::PathBuf;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ARGON2_TIME_COST: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Origin used when resolving stored filenames into absolute URLs.
    pub public_base_url: String,
    pub upload_dir: PathBuf,
    /// Secure flag on session cookies; off for plain-HTTP development.
    pub secure_cookies: bool,
    pub argon2_time_cost: u32,
    pub sms: SmsSettings,
}

/// Credentials for the Mobitel enterprise SMS gateway.
#[derive(Debug, Clone)]
pub struct SmsSettings {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub alias: String,
}

impl Config {
    pub fn from_env() -> Self {
        let is_production = env::var("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            "secretkey".to_string()
        });

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/gatepass".to_string()),
            port,
            jwt_secret,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            secure_cookies: is_production,
            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ARGON2_TIME_COST),
            sms: SmsSettings {
                endpoint: env::var("SMS_GATEWAY_URL").unwrap_or_else(|_| {
                    "https://msmsenterpriseapi.mobitel.lk/mSMSEnterpriseAPI/mSMSEnterpriseAPI"
                        .to_string()
                }),
                username: env::var("SMS_GATEWAY_USERNAME").unwrap_or_default(),
                password: env::var("SMS_GATEWAY_PASSWORD").unwrap_or_default(),
                alias: env::var("SMS_GATEWAY_ALIAS").unwrap_or_else(|_| "GATEPASS".to_string()),
            },
        }
    }
}
