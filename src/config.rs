use crate::core::models::ApiCredentials;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub expense_api_url: String,
    pub request_timeout_secs: u64,
    pub consumer_key: String,
    pub secret_key: String,
    pub api_key: String,
    pub analysis_key: String,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("expense_api_url", &self.expense_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("consumer_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("analysis_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            expense_api_url: env::var("EXPENSE_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            consumer_key: env::var("SPLITWISE_CONSUMER_KEY").unwrap_or_default(),
            secret_key: env::var("SPLITWISE_SECRET_KEY").unwrap_or_default(),
            api_key: env::var("SPLITWISE_API_KEY").unwrap_or_default(),
            analysis_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
        }
    }

    /// Credentials used when a session is opened without its own.
    pub fn default_credentials(&self) -> ApiCredentials {
        ApiCredentials {
            consumer_key: self.consumer_key.clone(),
            secret_key: self.secret_key.clone(),
            api_key: self.api_key.clone(),
            analysis_key: self.analysis_key.clone(),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
