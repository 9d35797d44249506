use std::env;

/// Runtime configuration, read once at startup and handed to the components
/// that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,
    pub database_url: String,
    pub api_keys: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://device_status.db?mode=rwc".to_string());
        let api_keys =
            parse_keys(&env::var("API_KEYS").unwrap_or_else(|_| "dev-key-123".to_string()));

        Self {
            http_addr,
            database_url,
            api_keys,
        }
    }
}

fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
