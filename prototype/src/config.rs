//! Configuration management (config.toml)
//!
//! Handles loading, saving, validating and providing defaults for the driver.
//! Settings are stored in TOML format in the platform-specific config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use prototype_core::DrawlistConfig;

const CONFIG_FILE: &str = "config.toml";

/// Driver configuration.
///
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Drawlist sizing
    #[serde(default)]
    pub drawlist: DrawlistConfig,
    /// Generated scene
    #[serde(default)]
    pub scene: SceneConfig,
    /// Frame loop behaviour
    #[serde(default)]
    pub run: RunConfig,
}

/// Scene generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// RNG seed; the same seed always builds the same scene (default: 0x5EED)
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of draw operations (default: 1000)
    #[serde(default = "default_objects")]
    pub objects: u32,
    /// Shader programs to spread objects over (default: 8, range: 1-256)
    #[serde(default = "default_shaders")]
    pub shaders: u32,
    /// Distinct textures; 0 leaves every model untextured (default: 16, max: 255)
    #[serde(default = "default_textures")]
    pub textures: u32,
    /// Distinct models (default: 32, range: 1-256)
    #[serde(default = "default_models")]
    pub models: u32,
    /// Share of objects on the overlay layer (default: 0.1)
    #[serde(default = "default_overlay_fraction")]
    pub overlay_fraction: f64,
    /// Share of objects drawn with blending (default: 0.2)
    #[serde(default = "default_translucent_fraction")]
    pub translucent_fraction: f64,
}

/// Frame loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Frames to simulate (default: 300)
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Share of objects toggled in or out of view each frame (default: 0.05)
    #[serde(default = "default_churn")]
    pub churn: f64,
    /// Swap one object's shader every N frames; 0 disables (default: 30)
    #[serde(default = "default_shader_swap_interval")]
    pub shader_swap_interval: u32,
}

fn default_seed() -> u64 {
    0x5EED
}
fn default_objects() -> u32 {
    1000
}
fn default_shaders() -> u32 {
    8
}
fn default_textures() -> u32 {
    16
}
fn default_models() -> u32 {
    32
}
fn default_overlay_fraction() -> f64 {
    0.1
}
fn default_translucent_fraction() -> f64 {
    0.2
}

fn default_frames() -> u32 {
    300
}
fn default_churn() -> f64 {
    0.05
}
fn default_shader_swap_interval() -> u32 {
    30
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            objects: default_objects(),
            shaders: default_shaders(),
            textures: default_textures(),
            models: default_models(),
            overlay_fraction: default_overlay_fraction(),
            translucent_fraction: default_translucent_fraction(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            churn: default_churn(),
            shader_swap_interval: default_shader_swap_interval(),
        }
    }
}

/// Errors loading, saving or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Check ranges the drawlist and key layout depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scene = &self.scene;
        if self.drawlist.capacity == 0 {
            return Err(invalid("drawlist.capacity must be greater than 0"));
        }
        if scene.objects as usize > self.drawlist.capacity {
            return Err(ConfigError::Invalid(format!(
                "scene.objects ({}) exceeds drawlist.capacity ({})",
                scene.objects, self.drawlist.capacity
            )));
        }
        if !(1..=256).contains(&scene.shaders) {
            return Err(invalid("scene.shaders must be between 1 and 256"));
        }
        if scene.textures > 255 {
            return Err(invalid("scene.textures must be at most 255"));
        }
        if !(1..=256).contains(&scene.models) {
            return Err(invalid("scene.models must be between 1 and 256"));
        }
        for (name, value) in [
            ("scene.overlay_fraction", scene.overlay_fraction),
            ("scene.translucent_fraction", scene.translucent_fraction),
            ("run.churn", self.run.churn),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 0.0 and 1.0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/prototype`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "prototype", "prototype")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    load_from(&path).unwrap_or_else(|err| {
        warn!("{err}; using defaults");
        Config::default()
    })
}

/// Loads the configuration from an explicit path.
///
/// # Errors
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to the config directory and returns the path
/// written, or `None` if there is no config directory.
pub fn save(config: &Config) -> Result<Option<PathBuf>, ConfigError> {
    let Some(dir) = config_dir() else {
        return Ok(None);
    };
    let path = dir.join(CONFIG_FILE);
    save_to(config, &path)?;
    Ok(Some(path))
}

/// Writes the configuration to `path`, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.drawlist.capacity, 8192);
        assert_eq!(config.scene.objects, 1000);
        assert_eq!(config.run.frames, 300);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scene]
            objects = 50
            seed = 7

            [run]
            churn = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.objects, 50);
        assert_eq!(config.scene.seed, 7);
        assert_eq!(config.scene.shaders, default_shaders());
        assert_eq!(config.run.churn, 0.5);
        assert_eq!(config.run.frames, default_frames());
        assert_eq!(config.drawlist, DrawlistConfig::default());
    }

    #[test]
    fn test_pretty_toml_round_trips() {
        let mut config = Config::default();
        config.drawlist.capacity = 256;
        config.scene.textures = 0;
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[drawlist]"));
        assert!(text.contains("[scene]"));
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_rejects_zero_capacity() {
        let mut config = Config::default();
        config.drawlist.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_more_objects_than_capacity() {
        let mut config = Config::default();
        config.drawlist.capacity = 10;
        config.scene.objects = 11;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds drawlist.capacity"));

        config.scene.objects = 10;
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_counts_wider_than_key_fields() {
        let mut config = Config::default();
        config.scene.shaders = 257;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scene.textures = 256;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scene.models = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        let mut config = Config::default();
        config.run.churn = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("run.churn"));

        let mut config = Config::default();
        config.scene.overlay_fraction = -0.1;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Files
    // =========================================================================

    #[test]
    fn test_save_to_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = Config::default();
        config.scene.seed = 99;

        save_to(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[scene]\nobjects = \"many\"\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
