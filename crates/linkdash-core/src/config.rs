//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/linkdash/config.toml)
//! 3. Environment variables (LINKDASH_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::Backend;

/// Environment variable prefix
const ENV_PREFIX: &str = "LINKDASH";

/// Storage key holding the serialized link collection
pub const DEFAULT_STORAGE_KEY: &str = "savedLinks";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db or per-key files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage adapter
    #[serde(default)]
    pub backend: Backend,

    /// Key the link collection is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Log file for the dashboard (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: Backend::default(),
            storage_key: default_storage_key(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (LINKDASH_DATA_DIR, LINKDASH_BACKEND, LINKDASH_STORAGE_KEY)
    /// 2. Config file (~/.config/linkdash/config.toml or LINKDASH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    /// Nothing is created on disk; storage backends create their own
    /// directories when opened.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            config.apply_env_overrides()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Failed to load config file: {:?}", path))
    }

    /// Load configuration from TOML text, then apply env overrides
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // LINKDASH_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // LINKDASH_BACKEND
        if let Ok(val) = std::env::var(format!("{}_BACKEND", ENV_PREFIX)) {
            self.backend = Backend::parse(&val)
                .with_context(|| format!("Unknown storage backend in {}_BACKEND: {}", ENV_PREFIX, val))?;
        }

        // LINKDASH_STORAGE_KEY
        if let Ok(val) = std::env::var(format!("{}_STORAGE_KEY", ENV_PREFIX)) {
            if !val.is_empty() {
                self.storage_key = val;
            }
        }

        Ok(())
    }

    /// Set a single value by its config file name
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => {
                self.data_dir = PathBuf::from(value);
            }
            "backend" => {
                self.backend = Backend::parse(value).with_context(|| {
                    format!("Unknown backend '{}'. Use sqlite, file or memory.", value)
                })?;
            }
            "storage_key" => {
                if value.is_empty() {
                    bail!("storage_key cannot be empty");
                }
                self.storage_key = value.to_string();
            }
            "log_file" => {
                self.log_file = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => bail!(
                "Unknown config key '{}'. Valid keys: data_dir, backend, storage_key, log_file",
                key
            ),
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with LINKDASH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linkdash")
            .join("config.toml")
    }

    /// Path of the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("linkdash.db")
    }

    /// Path of the dashboard log file
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Default data directory (~/.local/share/linkdash)
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkdash")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "LINKDASH_DATA_DIR",
        "LINKDASH_BACKEND",
        "LINKDASH_STORAGE_KEY",
        "LINKDASH_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.storage_key, "savedLinks");
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("linkdash"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();

        assert!(config.sqlite_path().ends_with("linkdash.db"));
        assert!(config.log_path().ends_with("debug.log"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKDASH_DATA_DIR", "/tmp/linkdash-test");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/linkdash-test"));
    }

    #[test]
    fn test_env_override_backend() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKDASH_BACKEND", "file");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.backend, Backend::File);

        env::set_var("LINKDASH_BACKEND", "carrier-pigeon");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_storage_key() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKDASH_STORAGE_KEY", "workLinks");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.storage_key, "workLinks");

        // Empty string keeps the current key
        env::set_var("LINKDASH_STORAGE_KEY", "");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.storage_key, "workLinks");
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/linkdash"),
            backend: Backend::File,
            storage_key: "savedLinks".to_string(),
            log_file: Some(PathBuf::from("/tmp/linkdash.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("backend = \"file\""));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.backend, config.backend);
        assert_eq!(parsed.log_file, config.log_file);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            backend = "file"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.storage_key, "savedLinks");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("LINKDASH_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();

        assert_eq!(config.backend, Backend::Sqlite);
        // Loading never creates the data directory
        assert!(!config.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_reports_bad_toml() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "backend = [").unwrap();

        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config {
            data_dir: temp_dir.path().join("data"),
            ..Config::default()
        };
        config.set_value("backend", "file").unwrap();
        config.set_value("storage_key", "homeLinks").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.backend, Backend::File);
        assert_eq!(loaded.storage_key, "homeLinks");
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("storage_key", "").is_err());
        assert!(config.set_value("backend", "nope").is_err());
        assert!(config.set_value("colour", "blue").is_err());

        config.set_value("log_file", "/tmp/x.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/x.log")));
        config.set_value("log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }
}
