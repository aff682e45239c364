//! Application configuration persisted next to the plan profiles.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::currency::EUR_TO_KZ_RATE;
use crate::errors::Result;
use crate::storage::json_backend::{app_data_dir, save_json_atomic};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// EUR → Kz rate used for consolidated figures.
    pub exchange_rate: f64,
    /// How many timestamped backups to keep per profile.
    pub backup_retention: usize,
    /// Email of the last user who logged in, pre-filled at the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_user_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange_rate: EUR_TO_KZ_RATE,
            backup_retention: 5,
            last_user_email: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::from_base(app_data_dir())
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_FILE),
        }
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        save_json_atomic(&self.path, config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
