//! Service configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional YAML file,
//! then CLI flags and their `INTERVIEW_API_*` environment variables.
//!
//! ```yaml
//! addr: 127.0.0.1:8080
//! database: /var/lib/interview/items.db
//! skip_migrations: false
//! cors_origin: "*"
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_ADDR: &str = "0.0.0.0:4567";
pub const DEFAULT_DATABASE: &str = "interview.db";

/// Resolved configuration for one run of the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Listen address
    pub addr: String,
    /// SQLite database file, or `:memory:`
    pub database: PathBuf,
    /// Require an existing schema instead of creating it
    pub skip_migrations: bool,
    /// Value of `Access-Control-Allow-Origin`
    pub cors_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            database: PathBuf::from(DEFAULT_DATABASE),
            skip_migrations: false,
            cors_origin: "*".to_string(),
        }
    }
}

/// Values given on the command line or through the environment; `None`
/// leaves the lower layer in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub database: Option<PathBuf>,
    pub skip_migrations: bool,
    pub cors_origin: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config file {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Read a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve all layers: defaults or `file`, then `overrides`.
    pub fn load(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.apply(overrides))
    }

    #[must_use]
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(addr) = overrides.addr {
            self.addr = addr;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if overrides.skip_migrations {
            self.skip_migrations = true;
        }
        if let Some(origin) = overrides.cors_origin {
            self.cors_origin = origin;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.addr, "0.0.0.0:4567");
        assert_eq!(config.database, PathBuf::from("interview.db"));
        assert!(!config.skip_migrations);
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("addr: 127.0.0.1:9000\n").unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(AppConfig::from_yaml_str("port: 80\n").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "addr: 127.0.0.1:9000\ndatabase: file.db\ncors_origin: https://a.example").unwrap();
        let config = AppConfig::load(
            Some(file.path()),
            ConfigOverrides {
                database: Some(PathBuf::from(":memory:")),
                skip_migrations: true,
                ..ConfigOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.database, PathBuf::from(":memory:"));
        assert!(config.skip_migrations);
        assert_eq!(config.cors_origin, "https://a.example");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/cfg.yaml")), ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/cfg.yaml"));
    }
}
