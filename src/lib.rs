pub mod account;
pub mod advisory;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod gateway;
pub mod models;
pub mod notifications;
pub mod wallet;
pub mod wizard;

use tracing_subscriber::EnvFilter;

pub use error::NavixError;
pub use gateway::{AuthUser, Gateway, MockGateway, SupabaseGateway};
pub use wizard::{WizardSession, WizardStep};

/// Initialize tracing for an embedding shell. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Navix core starting v{}", config::APP_VERSION);
}
