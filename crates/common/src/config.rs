use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the messaging gateway API
    pub gateway_api_url: String,

    /// Gateway API key, sent as `Authorization: App <key>`
    pub gateway_api_key: String,

    /// Sender identifier registered with the gateway
    pub gateway_sender: String,

    /// PostgreSQL connection string for the audit store
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 5)
    pub db_max_connections: u32,

    /// Minimum age for a recipient to be eligible (default: 30)
    pub recipient_min_age: i32,

    /// Message body used when no explicit body is configured
    pub default_message: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Any missing required variable is a fatal startup error.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gateway_api_url: std::env::var("GATEWAY_API_URL")
                .map_err(|_| anyhow::anyhow!("GATEWAY_API_URL environment variable is required"))?,
            gateway_api_key: std::env::var("GATEWAY_API_KEY")
                .map_err(|_| anyhow::anyhow!("GATEWAY_API_KEY environment variable is required"))?,
            gateway_sender: std::env::var("GATEWAY_SENDER")
                .map_err(|_| anyhow::anyhow!("GATEWAY_SENDER environment variable is required"))?,
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            recipient_min_age: std::env::var("RECIPIENT_MIN_AGE")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RECIPIENT_MIN_AGE must be a valid i32"))?,
            default_message: std::env::var("DEFAULT_MESSAGE").ok(),
        })
    }
}
