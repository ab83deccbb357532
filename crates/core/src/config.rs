//! Layered application configuration.
//!
//! Values come from built-in defaults, then `<config_dir>/memtui/config.json`,
//! then `MEMTUI__*` environment variables.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ConfigError, models::ImageKey};

/// Directory under the user's config dir holding `config.json`.
pub const CONFIG_DIR: &str = "memtui";
/// Prefix for environment overrides (`MEMTUI__COLUMNS=4`).
pub const ENV_PREFIX: &str = "MEMTUI";

const CONFIG_FILE: &str = "config.json";

const DEFAULT_FACES: [&str; 12] = [
    "apple",
    "banana",
    "cherry",
    "grape",
    "orange",
    "strawberry",
    "avocado",
    "pineapple",
    "watermelon",
    "pomegranate",
    "eggplant",
    "lemon",
];

/// Runtime configuration for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Distinct card faces; each is dealt twice.
    pub faces: Vec<String>,
    /// Number of columns in the card grid.
    pub columns: usize,
    /// Fixed shuffle seed. Fresh entropy is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Turn resolution delays.
    pub timings: Timings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            faces: DEFAULT_FACES.iter().map(|face| face.to_string()).collect(),
            columns: 6,
            seed: None,
            timings: Timings::default(),
        }
    }
}

/// Delays, in milliseconds, before a pending transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// After a matched pair, before the turn ends.
    pub match_delay_ms: u64,
    /// After a mismatched pair, before both cards flip back.
    pub mismatch_delay_ms: u64,
    /// How long the victory banner stays up.
    pub victory_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            match_delay_ms: 1000,
            mismatch_delay_ms: 1500,
            victory_delay_ms: 10_000,
        }
    }
}

impl Timings {
    pub(crate) fn match_delay(&self) -> Duration {
        Duration::from_millis(self.match_delay_ms)
    }

    pub(crate) fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    pub(crate) fn victory_delay(&self) -> Duration {
        Duration::from_millis(self.victory_delay_ms)
    }
}

impl AppConfig {
    /// Load configuration from the default location and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(default_config_path())
    }

    /// Load configuration from `path` (optional) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_layered(path.as_ref(), ENV_PREFIX)
    }

    /// Reject configurations that cannot produce a playable deck.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.faces.is_empty() {
            return Err(ConfigError::NoFaces);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        let mut seen = HashSet::with_capacity(self.faces.len());
        for face in &self.faces {
            let face = face.trim();
            if face.is_empty() {
                return Err(ConfigError::BlankFace);
            }
            if !seen.insert(face) {
                return Err(ConfigError::DuplicateFace(face.to_string()));
            }
        }
        Ok(())
    }

    /// Faces as image keys, in configured order.
    pub fn image_keys(&self) -> Vec<ImageKey> {
        self.faces
            .iter()
            .map(|face| ImageKey::new(face.trim()))
            .collect()
    }
}

/// Location of the user config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the default configuration unless a file already exists.
pub fn ensure_default_config() -> Result<PathBuf, ConfigError> {
    let path = default_config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let serialized = serde_json::to_string_pretty(&AppConfig::default())?;
    fs::write(path, serialized).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}

fn load_layered(path: &Path, env_prefix: &str) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Json)
                .required(false),
        )
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("faces"),
        )
        .build()?;
    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.faces.len(), 12);
        assert_eq!(config.timings.mismatch_delay_ms, 1500);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_layered(&dir.path().join("absent.json"), "MEMTUI_TEST_ABSENT")?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "faces": ["sun", "moon"], "columns": 2, "timings": { "victory_delay_ms": 3000 } }"#,
        )?;

        let config = load_layered(&path, "MEMTUI_TEST_FILE")?;
        assert_eq!(config.faces, vec!["sun".to_string(), "moon".to_string()]);
        assert_eq!(config.columns, 2);
        assert_eq!(config.timings.victory_delay_ms, 3000);
        assert_eq!(config.timings.match_delay_ms, 1000);
        Ok(())
    }

    #[test]
    fn environment_overrides_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "columns": 3 }"#)?;
        std::env::set_var("MEMTUI_TEST_ENV__COLUMNS", "4");
        std::env::set_var("MEMTUI_TEST_ENV__TIMINGS__MISMATCH_DELAY_MS", "800");

        let config = load_layered(&path, "MEMTUI_TEST_ENV")?;
        assert_eq!(config.columns, 4);
        assert_eq!(config.timings.mismatch_delay_ms, 800);
        Ok(())
    }

    #[test]
    fn environment_face_list_is_split_on_commas() -> Result<()> {
        let dir = tempdir()?;
        std::env::set_var("MEMTUI_TEST_FACES__FACES", "sun,moon,star");

        let config = load_layered(&dir.path().join("absent.json"), "MEMTUI_TEST_FACES")?;
        assert_eq!(
            config.faces,
            vec!["sun".to_string(), "moon".to_string(), "star".to_string()]
        );
        assert_eq!(config.columns, AppConfig::default().columns);
        Ok(())
    }

    #[test]
    fn duplicate_faces_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "faces": ["sun", "moon", "sun"] }"#)?;

        let err = load_layered(&path, "MEMTUI_TEST_DUP").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateFace(face) if face == "sun"));
        Ok(())
    }

    #[test]
    fn empty_faces_are_rejected() {
        let config = AppConfig {
            faces: Vec::new(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoFaces)));
    }

    #[test]
    fn default_config_is_written_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);

        write_default_config(&path)?;
        let written: AppConfig = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(written, AppConfig::default());

        fs::write(&path, r#"{ "columns": 2 }"#)?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, r#"{ "columns": 2 }"#);
        Ok(())
    }
}
