use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::sms::SmsClient;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub sms: SmsClient,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let sms = SmsClient::new(config.sms.clone());
        Self {
            pool,
            config: Arc::new(config),
            sms,
        }
    }
}
