use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "venue-booking";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to write config file: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("No config directory found for this platform")]
    NoConfigDir,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection URL; falls back to a SQLite file in the user data directory
    pub database_url: Option<String>,
    /// Log every SQL statement at info level
    pub sql_echo: bool,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join(APP_DIR).join("config.toml"))
    }

    /// Load the default config file, or defaults when there is none
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Write a default config file unless one already exists
    pub fn create_default() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        if path.exists() {
            log::info!("Config file already exists: {}", path.display());
            return Ok(path);
        }

        let config = Config {
            database_url: Some(default_database_url()),
            ..Default::default()
        };
        config.write_to(&path)?;
        Ok(path)
    }

    fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, contents).map_err(write_err)
    }

    /// The configured database URL, or the default SQLite file
    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(default_database_url)
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    format!("sqlite://{}?mode=rwc", dir.join("venue-booking.db").display())
}
