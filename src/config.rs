use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::board::{Grouping, Ordering};
use crate::error::{AppError, AppResult};
use crate::infra::http::DEFAULT_ENDPOINT;

const APP_DIRECTORY: &str = "kanban";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "kanban.log";
const DEFAULT_ASSET_ROOT: &str = "assets";

pub const ENDPOINT_ENV: &str = "KANBAN_ENDPOINT";
pub const ASSET_ROOT_ENV: &str = "KANBAN_ASSET_ROOT";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub grouping: Grouping,
    pub ordering: Ordering,
    pub asset_root: PathBuf,
}

/// Command-line values that take precedence over the environment and the stored file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub grouping: Option<Grouping>,
    pub ordering: Option<Ordering>,
}

impl AppConfig {
    pub fn load(overrides: ConfigOverrides) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, overrides, |key| env::var(key).ok())
    }

    fn resolve(
        stored: StoredConfig,
        overrides: ConfigOverrides,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let endpoint = overrides
            .endpoint
            .or_else(|| non_empty(env_lookup(ENDPOINT_ENV)))
            .or_else(|| non_empty(stored.endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let grouping = match overrides.grouping {
            Some(grouping) => grouping,
            None => stored.grouping()?.unwrap_or(Grouping::Status),
        };
        let ordering = match overrides.ordering {
            Some(ordering) => ordering,
            None => stored.ordering()?.unwrap_or(Ordering::Title),
        };

        let asset_root = non_empty(env_lookup(ASSET_ROOT_ENV))
            .or_else(|| non_empty(stored.asset_root.clone()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_ROOT));

        Ok(Self {
            endpoint,
            grouping,
            ordering,
            asset_root,
        })
    }
}

/// The on-disk settings file. Every field is optional; absent values fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_grouping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ordering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_root: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn grouping(&self) -> AppResult<Option<Grouping>> {
        self.default_grouping
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Grouping::from_str(value).ok_or_else(|| {
                    AppError::Configuration(format!("unknown grouping '{value}' in config"))
                })
            })
            .transpose()
    }

    pub fn ordering(&self) -> AppResult<Option<Ordering>> {
        self.default_ordering
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Ordering::from_str(value).ok_or_else(|| {
                    AppError::Configuration(format!("unknown ordering '{value}' in config"))
                })
            })
            .transpose()
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIRECTORY))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

pub fn log_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(LOG_FILE_NAME))
}
