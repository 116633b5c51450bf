//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::model::Config;

impl Config {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("ELBTAIL_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/elbtail/elbtail.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            Self::from_env()
        };

        // Environment variables override file config
        if let Ok(input) = std::env::var("ELBTAIL_INPUT") {
            config.input = Some(PathBuf::from(input));
        }
        if let Ok(workers) = std::env::var("ELBTAIL_WORKERS") {
            config.workers = workers.parse()?;
        }
        if let Ok(capacity) = std::env::var("ELBTAIL_CHANNEL_CAPACITY") {
            config.channel_capacity = capacity.parse()?;
        }
        if let Ok(fail_fast) = std::env::var("ELBTAIL_FAIL_FAST") {
            config.fail_fast = fail_fast.parse()?;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            input: std::env::var("ELBTAIL_INPUT").ok().map(PathBuf::from),
            workers: std::env::var("ELBTAIL_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.workers),
            channel_capacity: std::env::var("ELBTAIL_CHANNEL_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.channel_capacity),
            fail_fast: std::env::var("ELBTAIL_FAIL_FAST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.fail_fast),
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be > 0".to_string());
        }
        if self.channel_capacity == 0 {
            return Err("channel_capacity must be > 0".to_string());
        }
        if let Some(input) = &self.input {
            if !input.exists() {
                return Err(format!("input file not found: {}", input.display()));
            }
        }
        Ok(())
    }
}
