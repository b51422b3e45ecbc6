// common/src/config.rs
use chrono::Duration;
use config::{Config as ConfigFile, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Configuration surface for the guest chat subsystem.
///
/// These are the only knobs exposed upward to the host application; the
/// guest quota and session lifetimes are consumed by the rate limiter and
/// the session store, the endpoints by the HTTP transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Message cap per guest session
    pub max_messages: u32,
    /// Counting-window / session max lifetime, in seconds. The quota window
    /// is anchored to session creation, not sliding.
    pub window_duration_secs: i64,
    /// Idle period after which a guest session is renewed, in seconds
    pub inactivity_timeout_secs: i64,
    /// Remaining-quota level at or below which the sign-up nudge shows
    pub low_quota_threshold: u32,
    /// Endpoint for guest/marketing sends
    pub guest_endpoint: String,
    /// Endpoint for authenticated/business sends
    pub authenticated_endpoint: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_messages: 20,
            window_duration_secs: 86400,
            inactivity_timeout_secs: 1800,
            low_quota_threshold: 3,
            guest_endpoint: "http://127.0.0.1:8081/api/chat/guest".to_string(),
            authenticated_endpoint: "http://127.0.0.1:8081/api/chat".to_string(),
        }
    }
}

impl ChatConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Locate the config directory
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let defaults = Self::default();

        let config = ConfigFile::builder()
            .set_default("max_messages", defaults.max_messages as i64)?
            .set_default("window_duration_secs", defaults.window_duration_secs)?
            .set_default("inactivity_timeout_secs", defaults.inactivity_timeout_secs)?
            .set_default("low_quota_threshold", defaults.low_quota_threshold as i64)?
            .set_default("guest_endpoint", defaults.guest_endpoint)?
            .set_default("authenticated_endpoint", defaults.authenticated_endpoint)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add environment specific config
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            // Add a local config file for local overrides
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment variables with prefix "APP"
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files and environment, falling back to defaults on failure.
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to built-in defaults");
                Self::default()
            }
        }
    }

    pub fn window_duration(&self) -> Duration {
        Duration::seconds(self.window_duration_secs)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::seconds(self.inactivity_timeout_secs)
    }
}
