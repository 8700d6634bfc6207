use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;


// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, RetryPolicy, ServerSettings, Settings};

/// Command-line options shared by every entry point that needs configuration.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the TOML configuration file. A missing file is not an error.
    #[arg(long, default_value = "config.toml")]
    pub config: std::path::PathBuf,
}

/// Loads the application configuration.
///
/// Sources are layered from lowest to highest priority: built-in defaults, the
/// optional TOML file at `path`, then `TALLY__SECTION__KEY` environment
/// variables. A `.env` file in the working directory is loaded first, and an
/// empty `database.url` falls back to `DATABASE_URL`.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("retry.attempts", 3)?
        .set_default("retry.delay_ms", 1000)?
        .set_default("retry.backoff", 2.0)?
        .set_default("logging.level", "info")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("TALLY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let mut settings = builder.try_deserialize::<Settings>()?;

    if settings.database.url.trim().is_empty() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.database.url = url;
        }
    }

    settings.validate()?;
    Ok(settings)
}
