use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Navix";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Storage bucket holding every uploaded document object.
pub const STORAGE_BUCKET: &str = "navix";

/// Lifetime of signed document URLs handed to the UI, in seconds.
pub const SIGNED_URL_EXPIRY_SECS: u64 = 60;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Errors while assembling configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Connection settings for the remote data gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend project, without a trailing slash.
    pub base_url: String,
    /// Publishable (anonymous) API key sent with every request.
    pub anon_key: String,
}

impl GatewayConfig {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Read `NAVIX_BACKEND_URL` and `NAVIX_BACKEND_ANON_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("NAVIX_BACKEND_URL").map_err(|_| ConfigError::MissingVar("NAVIX_BACKEND_URL"))?;
        let anon_key = env::var("NAVIX_BACKEND_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("NAVIX_BACKEND_ANON_KEY"))?;
        Ok(Self::new(&base_url, &anon_key))
    }
}
