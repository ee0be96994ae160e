// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for pi-provision

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// Environment variable overriding the key output directory
pub const KEY_DIR_ENV: &str = "PI_PROVISION_KEY_DIR";

/// Runtime configuration for the wizard and the derivation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory receiving the generated keypair
    #[serde(default = "default_key_dir")]
    pub key_dir: PathBuf,

    /// Path of the emitted settings document
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Seed default for the operating-system image question
    #[serde(default = "default_image_url")]
    pub image_url: String,

    /// Key type handed to the keypair generator
    #[serde(default = "default_key_type")]
    pub key_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_dir: default_key_dir(),
            settings_path: default_settings_path(),
            image_url: default_image_url(),
            key_type: default_key_type(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SetupError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file when present, fall back to defaults otherwise, then
    /// apply the environment override for the key directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        if let Ok(dir) = std::env::var(KEY_DIR_ENV) {
            if !dir.is_empty() {
                config.key_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.image_url.is_empty() {
            return Err(SetupError::InvalidConfig {
                message: "image_url cannot be empty".to_string(),
            });
        }

        if self.key_type.is_empty() {
            return Err(SetupError::InvalidConfig {
                message: "key_type cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

// Default value functions

fn default_key_dir() -> PathBuf {
    PathBuf::from("keys")
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("settings.sh")
}

fn default_image_url() -> String {
    "https://downloads.raspberrypi.org/raspios_lite_arm64_latest".to_string()
}

fn default_key_type() -> String {
    "ed25519".to_string()
}
