use std::env;

/// All runtime configuration, read once from the environment at startup and
/// shared as actix app data.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub payment_webhook_secret: String,
    pub push_gateway_url: Option<String>,
    pub push_server_key: Option<String>,
    /// How often clients should refresh their conversation list (seconds).
    pub chat_list_poll_secs: u64,
    /// How often clients should refresh an open message thread (seconds).
    pub message_poll_secs: u64,
    /// Interval of the subscription expiry sweep (seconds).
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Read configuration from the environment. Panics on missing required
    /// variables — the process cannot run without them.
    pub fn from_env() -> Self {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            bind_addr: format!("0.0.0.0:{port}"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            payment_webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET")
                .expect("PAYMENT_WEBHOOK_SECRET must be set"),
            push_gateway_url: env::var("PUSH_GATEWAY_URL").ok(),
            push_server_key: env::var("PUSH_SERVER_KEY").ok(),
            chat_list_poll_secs: env_u64("CHAT_LIST_POLL_SECS", 3),
            message_poll_secs: env_u64("MESSAGE_POLL_SECS", 2),
            sweep_interval_secs: env_u64("SUBSCRIPTION_SWEEP_SECS", 3600),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
