use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ProcgateError, Result};

pub const MIN_POLL_INTERVAL_SECS: u64 = 1;
pub const MIN_OS_CALL_TIMEOUT_MS: u64 = 100;

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_os_call_timeout_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between two scheduled process listings
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Upper bound for a single OS query or control call
    #[serde(default = "default_os_call_timeout_ms")]
    pub os_call_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            os_call_timeout_ms: default_os_call_timeout_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from an explicit file. A missing, empty or unreadable file yields
    /// the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(path)?;
        if data.is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {:?}: {}", path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ProcgateError::config("Could not determine config directory"))?;

        Ok(config_dir.join("procgate").join("config.json"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS))
    }

    pub fn os_call_timeout(&self) -> Duration {
        Duration::from_millis(self.os_call_timeout_ms.max(MIN_OS_CALL_TIMEOUT_MS))
    }

    pub fn set_poll_interval_secs(&mut self, secs: u64) -> Result<()> {
        if secs < MIN_POLL_INTERVAL_SECS {
            return Err(ProcgateError::config(format!(
                "Poll interval must be at least {} second",
                MIN_POLL_INTERVAL_SECS
            )));
        }
        self.poll_interval_secs = secs;
        Ok(())
    }

    pub fn set_os_call_timeout_ms(&mut self, ms: u64) -> Result<()> {
        if ms < MIN_OS_CALL_TIMEOUT_MS {
            return Err(ProcgateError::config(format!(
                "OS call timeout must be at least {} ms",
                MIN_OS_CALL_TIMEOUT_MS
            )));
        }
        self.os_call_timeout_ms = ms;
        Ok(())
    }
}
