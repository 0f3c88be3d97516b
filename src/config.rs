//! User configuration
//!
//! Loaded from `config.toml` in the platform config directory, or from an
//! explicit path. Every section is optional.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::targets::{self, TargetSet};

pub const CONFIG_ENV: &str = "CHOREKIT_CONFIG";
pub const SYSTEM_DIRS_ENV: &str = "CHOREKIT_SYSTEM_DIRS";
pub const USER_DIRS_ENV: &str = "CHOREKIT_USER_DIRS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub targets: TargetSettings,
    pub speedtest: SpeedTestSettings,
    pub geocode: GeocodeSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSettings {
    /// System-owned temp directories. Platform defaults when absent.
    pub system: Option<Vec<PathBuf>>,
    /// Per-user temp directories. Platform defaults when absent.
    pub user: Option<Vec<PathBuf>>,
    /// Prefix stripped from paths in console output. Defaults to home.
    pub display_base: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeedTestSettings {
    pub servers: Vec<String>,
    pub download_bytes: u64,
    pub upload_bytes: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodeSettings {
    pub country: String,
    pub dataset_url: String,
    pub cache_dir: Option<PathBuf>,
}

impl Default for SpeedTestSettings {
    fn default() -> Self {
        Self {
            servers: vec!["https://speed.cloudflare.com".to_string()],
            download_bytes: 25_000_000,
            upload_bytes: 10_000_000,
            timeout_secs: 60,
        }
    }
}

impl Default for GeocodeSettings {
    fn default() -> Self {
        Self {
            country: "us".to_string(),
            dataset_url: "https://download.geonames.org/export/zip".to_string(),
            cache_dir: None,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/chorekit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chorekit").join("config.toml"))
    }

    /// Load using the lookup order: explicit path, `CHOREKIT_CONFIG`,
    /// the default location if it exists, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the target directories, applying environment overrides.
    pub fn target_set(&self) -> Result<TargetSet, ConfigError> {
        self.target_set_with(env::var_os(SYSTEM_DIRS_ENV), env::var_os(USER_DIRS_ENV))
    }

    /// Same as [`Config::target_set`] with explicit override values.
    pub fn target_set_with(
        &self,
        system_override: Option<OsString>,
        user_override: Option<OsString>,
    ) -> Result<TargetSet, ConfigError> {
        let system = system_override
            .map(|v| env::split_paths(&v).collect())
            .or_else(|| self.targets.system.clone())
            .unwrap_or_else(targets::default_system_dirs);
        let user = user_override
            .map(|v| env::split_paths(&v).collect())
            .or_else(|| self.targets.user.clone())
            .unwrap_or_else(targets::default_user_dirs);
        TargetSet::new(system, user)
    }

    pub fn display_base(&self) -> Option<PathBuf> {
        self.targets
            .display_base
            .clone()
            .or_else(crate::utils::home_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.geocode.country, "us");
        assert_eq!(config.speedtest.servers.len(), 1);
        assert!(config.targets.system.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let config: Config = toml::from_str(
            r#"
            [targets]
            system = ["/s1", "/s2"]
            user = ["/u"]
            display_base = "/home/me"

            [speedtest]
            servers = ["https://a.example", "https://b.example"]
            download_bytes = 1000
            upload_bytes = 500
            timeout_secs = 5

            [geocode]
            country = "de"
            dataset_url = "https://mirror.example/zip"
            cache_dir = "/cache"
            "#,
        )
        .unwrap();

        let set = config.target_set_with(None, None).unwrap();
        assert_eq!(set.system(), &[PathBuf::from("/s1"), PathBuf::from("/s2")]);
        assert_eq!(set.user(), &[PathBuf::from("/u")]);
        assert_eq!(config.display_base(), Some(PathBuf::from("/home/me")));
        assert_eq!(config.speedtest.download_bytes, 1000);
        assert_eq!(config.geocode.country, "de");
        assert_eq!(config.geocode.cache_dir, Some(PathBuf::from("/cache")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[targets]\nsytem = []\n").is_err());
    }

    #[test]
    fn override_replaces_file_value() {
        let config: Config = toml::from_str("[targets]\nsystem = [\"/s\"]\nuser = [\"/u\"]\n").unwrap();
        let joined = env::join_paths(["/o1", "/o2"]).unwrap();
        let set = config.target_set_with(Some(joined), None).unwrap();
        assert_eq!(set.system(), &[PathBuf::from("/o1"), PathBuf::from("/o2")]);
        assert_eq!(set.user(), &[PathBuf::from("/u")]);
    }

    #[test]
    fn overlapping_groups_fail_validation() {
        let config: Config = toml::from_str("[targets]\nsystem = [\"/x\"]\nuser = [\"/x\"]\n").unwrap();
        assert!(matches!(
            config.target_set_with(None, None),
            Err(ConfigError::OverlappingTarget(_))
        ));
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[targets\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Config::from_file(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
