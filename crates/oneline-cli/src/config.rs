//! Configuration for a CLI run.
//!
//! The configuration is layered: the defaults, then the first configuration
//! file found (see [`ConfigSource`]), then the [`Overrides`] given on the
//! command line.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use oneline::{OnelineError, config::AppConfig};

/// Configuration file searched for in the working directory
const LOCAL_CONFIG: &str = "oneline/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid override `{name}`: {reason}")]
    InvalidOverride { name: &'static str, reason: String },
}

impl From<ConfigError> for OnelineError {
    fn from(err: ConfigError) -> Self {
        OnelineError::Config(err.to_string())
    }
}

/// Where the configuration of a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; must exist
    Explicit(PathBuf),
    /// `oneline/config.toml` below the working directory
    Local(PathBuf),
    /// `config.toml` in the platform configuration directory
    System(PathBuf),
    /// No file found
    Defaults,
}

impl ConfigSource {
    /// Picks the configuration source.
    ///
    /// An explicit path always wins, even if it does not exist; otherwise the
    /// local file is preferred over the system one.
    pub fn locate(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Self::Local(local);
        }

        match ProjectDirs::from("com", "oneline", "oneline") {
            Some(dirs) => {
                let system = dirs.config_dir().join("config.toml");
                if system.exists() {
                    return Self::System(system);
                }
                debug!(path = system.display().to_string(); "No system configuration file");
            }
            None => debug!("Could not determine platform-specific config directory"),
        }
        Self::Defaults
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::System(path) => Some(path),
            Self::Defaults => None,
        }
    }

    /// Reads the configuration from this source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] for an explicit path that does
    /// not exist, or [`ConfigError::Parse`] for malformed TOML.
    pub fn load(&self) -> Result<AppConfig, OnelineError> {
        let Some(path) = self.path() else {
            debug!("No configuration file found, using default configuration");
            return Ok(AppConfig::default());
        };
        info!(source:% = self; "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(config)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "explicit path {}", path.display()),
            Self::Local(path) => write!(f, "local path {}", path.display()),
            Self::System(path) => write!(f, "system path {}", path.display()),
            Self::Defaults => f.write_str("defaults"),
        }
    }
}

/// Values set on the command line, applied over the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub indexes: Option<bool>,
    pub short_circuit: Option<bool>,
    pub voltage: Option<bool>,
    pub line_impedance: Option<bool>,
    pub busbar_threshold: Option<usize>,
    pub busbar_pitch: Option<f32>,
    pub switch_offset: Option<f32>,
}

impl Overrides {
    /// Writes every set value into `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for a busbar pitch that is
    /// not positive or a negative switch offset; `config` is left untouched.
    pub fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(pitch) = self.busbar_pitch.filter(|pitch| pitch.is_nan() || *pitch <= 0.0) {
            return Err(ConfigError::InvalidOverride {
                name: "busbar-pitch",
                reason: format!("{pitch} is not a positive length"),
            });
        }
        if let Some(offset) = self.switch_offset.filter(|offset| offset.is_nan() || *offset < 0.0) {
            return Err(ConfigError::InvalidOverride {
                name: "switch-offset",
                reason: format!("{offset} is not a non-negative length"),
            });
        }

        let labels = &mut config.labels;
        let toggles = [
            (&mut labels.indexes, self.indexes),
            (&mut labels.short_circuit, self.short_circuit),
            (&mut labels.voltage, self.voltage),
            (&mut labels.line_impedance, self.line_impedance),
        ];
        for (target, value) in toggles {
            if let Some(value) = value {
                *target = value;
            }
        }

        let layout = &mut config.layout;
        if let Some(threshold) = self.busbar_threshold {
            layout.busbar_threshold = threshold;
        }
        if let Some(pitch) = self.busbar_pitch {
            layout.busbar_pitch = pitch;
        }
        if let Some(offset) = self.switch_offset {
            layout.switch_offset = offset;
        }
        debug!(overrides:? = self; "Applied command-line overrides");
        Ok(())
    }
}

/// Loads the configuration for a run and applies `overrides` over it.
///
/// # Errors
///
/// Returns [`OnelineError::Config`] if the configuration file is missing or
/// malformed, or an override is out of range.
pub fn load_config(
    explicit_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<AppConfig, OnelineError> {
    let mut config = ConfigSource::locate(explicit_path).load()?;
    overrides.apply(&mut config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nbusbar_threshold = 5\n").unwrap();

        let config = load_config(Some(path.as_path()), &Overrides::default()).unwrap();
        assert_eq!(config.layout.busbar_threshold, 5);
    }

    #[test]
    fn test_explicit_path_wins_even_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let source = ConfigSource::locate(Some(path.as_path()));
        assert_eq!(source, ConfigSource::Explicit(path.clone()));
        let err = source.load().unwrap_err();
        assert!(matches!(err, OnelineError::Config(message) if message.contains("nope.toml")));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout\n").unwrap();

        let err = load_config(Some(path.as_path()), &Overrides::default()).unwrap_err();
        assert!(matches!(err, OnelineError::Config(_)));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[layout]\nbusbar_threshold = 5\nswitch_offset = 0.4\n[labels]\nvoltage = true\n",
        )
        .unwrap();
        let overrides = Overrides {
            line_impedance: Some(true),
            busbar_threshold: Some(2),
            ..Overrides::default()
        };

        let config = load_config(Some(path.as_path()), &overrides).unwrap();
        assert_eq!(config.layout.busbar_threshold, 2);
        assert_eq!(config.layout.switch_offset, 0.4);
        assert!(config.labels.voltage);
        assert!(config.labels.line_impedance);
    }

    #[test]
    fn test_invalid_override_leaves_config_untouched() {
        let mut config = AppConfig::default();
        let overrides = Overrides {
            indexes: Some(true),
            busbar_pitch: Some(0.0),
            ..Overrides::default()
        };

        let err = overrides.apply(&mut config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { name: "busbar-pitch", .. }));
        assert!(!config.labels.indexes);

        let overrides = Overrides {
            switch_offset: Some(-1.0),
            ..Overrides::default()
        };
        assert!(overrides.apply(&mut config).is_err());
    }

    #[test]
    fn test_source_display_names_origin() {
        let source = ConfigSource::Local(PathBuf::from(LOCAL_CONFIG));
        assert_eq!(source.to_string(), "local path oneline/config.toml");
        assert_eq!(ConfigSource::Defaults.path(), None);
    }
}
