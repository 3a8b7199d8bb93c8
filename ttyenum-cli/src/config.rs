//! Configuration file support for ttyenum.
//!
//! Configuration is loaded from multiple sources with the following priority (highest first):
//! 1. Command-line arguments
//! 2. Environment variables (TTYENUM_*)
//! 3. Local config file (./ttyenum.toml)
//! 4. Global config file (~/.config/ttyenum/config.toml)

use {
    crate::StrategyArg,
    directories::ProjectDirs,
    log::{debug, warn},
    serde::{Deserialize, Serialize},
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

/// Local configuration file name.
pub const LOCAL_CONFIG_FILE: &str = "ttyenum.toml";

/// Port scanning configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// tty class directory (default: /sys/class/tty).
    pub sysfs_root: Option<PathBuf>,
    /// Device directory (default: /dev).
    pub dev_dir: Option<PathBuf>,
    /// Glob patterns replacing the platform's device name patterns.
    pub device_patterns: Option<Vec<String>>,
    /// Discovery strategy to use.
    pub strategy: Option<StrategyArg>,
}

/// Lock file configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock directories to search, replacing the standard list.
    pub directories: Option<Vec<PathBuf>>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan configuration.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Lock configuration.
    #[serde(default)]
    pub lock: LockConfig,
}

impl Config {
    /// Load configuration from all available sources.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global_config) = Self::load_from_file(&global_path) {
                debug!("Loaded global config from {}", global_path.display());
                config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        if let Some(local_config) = Self::load_from_file(Path::new(LOCAL_CONFIG_FILE)) {
            debug!("Loaded local config from {LOCAL_CONFIG_FILE}");
            config.merge(local_config);
        }

        config
    }

    /// Load configuration from a specific file path (--config flag).
    pub fn load_from_path(path: &Path) -> Self {
        if let Some(config) = Self::load_from_file(path) {
            debug!("Loaded config from {}", path.display());
            config
        } else {
            warn!(
                "Could not load config from {}, using defaults",
                path.display()
            );
            Self::default()
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                },
            },
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                None
            },
        }
    }

    /// Get the global configuration directory.
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ttyenum").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the global configuration file path.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Merge another config into this one; set fields in `other` win.
    fn merge(&mut self, other: Self) {
        if other.scan.sysfs_root.is_some() {
            self.scan.sysfs_root = other.scan.sysfs_root;
        }
        if other.scan.dev_dir.is_some() {
            self.scan.dev_dir = other.scan.dev_dir;
        }
        if other.scan.device_patterns.is_some() {
            self.scan.device_patterns = other.scan.device_patterns;
        }
        if other.scan.strategy.is_some() {
            self.scan.strategy = other.scan.strategy;
        }
        if other.lock.directories.is_some() {
            self.lock.directories = other.lock.directories;
        }
    }
}
