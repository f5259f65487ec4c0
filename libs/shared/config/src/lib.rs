use std::env;
use tracing::warn;

/// Client configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base_url: String,
    pub token_path: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("HMS_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("HMS_API_BASE_URL not set, using empty value");
                    String::new()
                }),
            token_path: env::var("HMS_TOKEN_PATH").ok(),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            token_path: None,
        }
    }
}
