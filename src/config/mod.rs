//! Configuration - TOML-backed defaults for components and the host.
//!
//! The active configuration is thread-local, like every other piece of host
//! state. Components read it at mount time unless their props override it.

mod types;

pub use types::{Config, ConfigIssue, DisclosureConfig, HostConfig, StripConfig};

use std::cell::RefCell;
use std::path::Path;

use crate::error::{Error, Result};

thread_local! {
    static ACTIVE: RefCell<Config> = RefCell::new(Config::default());
}

/// The active configuration.
pub fn current() -> Config {
    ACTIVE.with(|c| c.borrow().clone())
}

/// Replace the active configuration.
pub fn set_config(config: Config) {
    ACTIVE.with(|c| *c.borrow_mut() = config);
}

/// Restore the default configuration (for testing).
pub fn reset_config() {
    set_config(Config::default());
}

impl Config {
    /// Parse a configuration from TOML text. Missing fields take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::ConfigParse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Read and parse a configuration file, rejecting configs with errors.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;

        let errors: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|issue| issue.is_error)
            .map(|issue| issue.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(Error::InvalidConfig(errors.join("; ")));
        }

        Ok(config)
    }
}

/// Load a configuration file, falling back to defaults on any problem.
///
/// Every issue is logged; warnings do not cause a fallback.
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        log::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    let config = match std::fs::read_to_string(path) {
        Ok(contents) => match Config::from_toml_str(&contents) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::error!("Failed to parse config: {}", e);
                return Config::default();
            }
        },
        Err(e) => {
            log::error!("Failed to read config file: {}", e);
            return Config::default();
        }
    };

    let issues = config.validate();
    let mut has_errors = false;
    for issue in &issues {
        if issue.is_error {
            has_errors = true;
            log::error!("Config: {}", issue);
        } else {
            log::warn!("Config: {}", issue);
        }
    }

    if has_errors {
        log::error!("Config has errors; falling back to defaults.");
        return Config::default();
    }

    config
}
