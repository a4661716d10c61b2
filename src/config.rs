//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file: `--config <FILE>`, or `config.toml` in the platform config
//!    directory
//! 3. Environment variables prefixed with `DUPLINE_` (e.g. `DUPLINE_MODE`,
//!    `DUPLINE_REMOVE_MODE`)
//! 4. Command-line flags
//!
//! ```toml
//! mode = "offset-length"
//! offset = 2
//! length = 4
//! remove_mode = "keep-last"
//! theme = "dark"
//! ```
//!
//! Mode and policy names are validated here, so a typo fails with a
//! suggestion instead of silently falling back to a default.
//!
//! The interactive view persists its last settings through a
//! [`SettingsStore`], in `view-settings.toml` next to the config file. The
//! batch command never reads that file, so a view session cannot change what
//! `dupline scan` reports.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::ValueEnum;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::RetentionPolicy;
use crate::cli::{MatchArgs, ThemeArg};
use crate::duplicates::MatchSettings;
use crate::error::ConfigError;
use crate::scanner::MatchMode;

/// File name of the interactive view's stored settings.
pub const SETTINGS_FILE_NAME: &str = "view-settings.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "DUPLINE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Config {
    /// Matching mode.
    pub mode: MatchMode,
    /// Window offset in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Window length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Retention policy used when removing duplicates.
    pub remove_mode: RetentionPolicy,
    /// Preferred TUI theme.
    pub theme: ThemeArg,
}

/// Raw layered values, validated into a [`Config`].
///
/// Names stay strings until validation so that unknown values produce
/// [`ConfigError`]s with suggestions.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    mode: Option<String>,
    offset: Option<usize>,
    length: Option<usize>,
    remove_mode: Option<String>,
    theme: Option<String>,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let defaults = Config::default();
        Ok(Self {
            mode: raw
                .mode
                .as_deref()
                .map(str::parse::<MatchMode>)
                .transpose()?
                .unwrap_or(defaults.mode),
            offset: raw.offset,
            length: raw.length,
            remove_mode: raw
                .remove_mode
                .as_deref()
                .map(str::parse::<RetentionPolicy>)
                .transpose()?
                .unwrap_or(defaults.remove_mode),
            theme: raw
                .theme
                .as_deref()
                .map(parse_theme)
                .transpose()?
                .unwrap_or(defaults.theme),
        })
    }
}

fn parse_theme(value: &str) -> Result<ThemeArg, ConfigError> {
    ThemeArg::from_str(value.trim(), true)
        .map_err(|_| ConfigError::Load(format!("unknown theme '{value}'")))
}

impl Config {
    /// Load defaults < file < environment.
    ///
    /// `path` replaces the platform default file. An explicit path must
    /// exist; a missing default file is simply skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or holds an
    /// unknown mode, policy or theme.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::Load(format!(
                        "config file '{}' does not exist",
                        explicit.display()
                    )));
                }
                Some(explicit.to_path_buf())
            }
            None => default_config_path(),
        };
        Self::load_layers(file.as_deref(), true)
    }

    /// Load a single TOML file over the defaults, without the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or holds an
    /// unknown value.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layers(Some(path), false)
    }

    fn load_layers(file: Option<&Path>, with_env: bool) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(file) = file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        if with_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }

        let raw: RawConfig = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        Config::try_from(raw)
    }

    /// Load the interactive view's starting settings.
    ///
    /// Settings stored by an earlier view session replace the layered
    /// configuration of [`Config::load`] as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration or the stored settings
    /// are invalid.
    pub fn load_for_view(path: Option<&Path>, store: &dyn SettingsStore) -> Result<Self, ConfigError> {
        let layered = Self::load(path)?;
        match store.load()? {
            Some(stored) => {
                log::debug!("Using stored view settings ({})", stored.match_settings());
                Ok(stored)
            }
            None => Ok(layered),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_cli(mut self, args: &MatchArgs) -> Self {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if args.offset.is_some() {
            self.offset = args.offset;
        }
        if args.length.is_some() {
            self.length = args.length;
        }
        if let Some(policy) = args.remove_duplicates_mode {
            self.remove_mode = policy;
        }
        self
    }

    /// Matching settings of this configuration.
    #[must_use]
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            mode: self.mode,
            offset: self.offset,
            length: self.length,
        }
    }
}

/// Default platform-specific configuration path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "dupline", "dupline").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default platform-specific path of the view's stored settings.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    default_config_path().map(|path| path.with_file_name(SETTINGS_FILE_NAME))
}

/// Persistence of the interactive view's settings.
pub trait SettingsStore: Send {
    /// Load the stored settings, `None` if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if stored settings exist but are invalid.
    fn load(&self) -> Result<Option<Config>, ConfigError>;

    /// Store `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the settings cannot be written.
    fn save(&self, config: &Config) -> Result<(), ConfigError>;
}

/// Settings stored as a TOML file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store next to the configuration file at `config_path`.
    #[must_use]
    pub fn beside(config_path: &Path) -> Self {
        Self::new(config_path.with_file_name(SETTINGS_FILE_NAME))
    }

    /// Store at the platform default path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if no config directory can be determined.
    pub fn platform_default() -> Result<Self, ConfigError> {
        default_settings_path()
            .map(Self::new)
            .ok_or_else(|| ConfigError::Load("failed to determine config directory".to_string()))
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Config>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Config::load_from_path(&self.path).map(Some)
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Load(e.to_string()))?;
        }
        let content = toml::to_string_pretty(config).map_err(|e| ConfigError::Load(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| ConfigError::Load(e.to_string()))?;
        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// In-memory settings, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    stored: Mutex<Option<Config>>,
}

impl MemorySettingsStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved settings, if any.
    #[must_use]
    pub fn stored(&self) -> Option<Config> {
        match self.stored.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Config>, ConfigError> {
        Ok(self.stored())
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let mut guard = match self.stored.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mode, MatchMode::Line);
        assert_eq!(config.remove_mode, RetentionPolicy::KeepFirst);
        assert_eq!(config.theme, ThemeArg::Auto);
        assert!(config.offset.is_none());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "mode = \"offset-length\"\noffset = 2\nlength = 4\nremove_mode = \"keep-last\"\ntheme = \"dark\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.mode, MatchMode::OffsetLength);
        assert_eq!(config.offset, Some(2));
        assert_eq!(config.length, Some(4));
        assert_eq!(config.remove_mode, RetentionPolicy::KeepLast);
        assert_eq!(config.theme, ThemeArg::Dark);
    }

    #[test]
    fn test_unknown_policy_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "remove_mode = \"keep-lats\"\n").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedPolicy {
                value: "keep-lats".to_string(),
                suggestion: Some("keep-last".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_mode_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mode = \"lines\"\n").unwrap();

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mode = = \n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_cli_overrides() {
        let args = MatchArgs {
            mode: Some(MatchMode::OffsetLength),
            offset: None,
            length: Some(3),
            remove_duplicates_mode: Some(RetentionPolicy::RemoveAll),
        };
        let base = Config {
            offset: Some(1),
            length: Some(9),
            ..Config::default()
        };
        let config = base.with_cli(&args);
        assert_eq!(config.mode, MatchMode::OffsetLength);
        assert_eq!(config.offset, Some(1));
        assert_eq!(config.length, Some(3));
        assert_eq!(config.remove_mode, RetentionPolicy::RemoveAll);
        assert_eq!(config.match_settings().window().unwrap().to_string(), "offset-length (offset=1, length=3)");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("view-settings.toml"));
        assert_eq!(store.load().unwrap(), None);

        let config = Config {
            mode: MatchMode::OffsetLength,
            offset: Some(0),
            length: Some(5),
            remove_mode: RetentionPolicy::RemoveAll,
            theme: ThemeArg::Light,
        };
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
    }

    #[test]
    fn test_store_is_not_the_config_file() {
        let store = FileSettingsStore::beside(Path::new("/etc/dupline/config.toml"));
        assert_eq!(store.path(), Path::new("/etc/dupline/view-settings.toml"));

        if let (Some(config), Some(settings)) = (default_config_path(), default_settings_path()) {
            assert_ne!(config, settings);
            assert_eq!(config.parent(), settings.parent());
        }
    }

    #[test]
    fn test_load_for_view_prefers_stored_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mode = \"offset-length\"\noffset = 2\nlength = 4\n").unwrap();

        let store = MemorySettingsStore::new();
        assert_eq!(Config::load_for_view(Some(&path), &store).unwrap().offset, Some(2));

        store.save(&Config::default()).unwrap();
        assert_eq!(Config::load_for_view(Some(&path), &store).unwrap(), Config::default());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.load().unwrap(), None);

        let config = Config {
            theme: ThemeArg::Dark,
            ..Config::default()
        };
        store.save(&config).unwrap();
        assert_eq!(store.stored(), Some(config));
    }
}
