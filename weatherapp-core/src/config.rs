use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::DEFAULT_FORECAST_COUNT,
    model::{ApiKey, Coordinates},
    probe::{DEFAULT_PROBE_HOST, DEFAULT_PROBE_PORT, TcpProbe},
};

/// Fixed position used instead of device location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Endpoint the connectivity probe dials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PROBE_HOST.to_string(),
            port: DEFAULT_PROBE_PORT,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// forecast_count = 6
///
/// [location]
/// latitude = 37.7749
/// longitude = -122.4194
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<ApiKey>,
    pub forecast_count: Option<u32>,
    pub location: Option<LocationConfig>,
    pub probe: Option<ProbeConfig>,
}

impl Config {
    /// API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().filter(|key| !key.is_empty()).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weatherapp configure` and enter your API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: ApiKey) {
        self.api_key = Some(api_key);
    }

    /// Configured position, validated.
    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        self.location
            .map(|loc| {
                Coordinates::new(loc.latitude, loc.longitude)
                    .context("Invalid [location] in configuration")
            })
            .transpose()
    }

    pub fn set_location(&mut self, coords: Coordinates) {
        self.location = Some(LocationConfig {
            latitude: coords.latitude,
            longitude: coords.longitude,
        });
    }

    pub fn forecast_count(&self) -> u32 {
        self.forecast_count.unwrap_or(DEFAULT_FORECAST_COUNT)
    }

    pub fn probe(&self) -> TcpProbe {
        let probe = self.probe.clone().unwrap_or_default();
        TcpProbe::new(probe.host, probe.port)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherapp", "weatherapp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
