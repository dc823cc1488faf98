//! Application configuration
//!
//! Stored as pretty RON in `tubekit.ron`. A missing file is not an error:
//! the defaults are used and written on the next save.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tk_core::{EditorSettings, ExportFormat};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "tubekit.ron";

/// Collaborator service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// When false every collaborator call is skipped
    pub enabled: bool,
    pub base_url: String,
    /// Group name attached to saved positions
    pub positions_group: String,
    pub bom_page_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:3001".to_string(),
            positions_group: tk_core::constants::POSITIONS_GROUP.to_string(),
            bom_page_size: 50,
        }
    }
}

/// Where and how layouts are exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub file_stem: String,
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            file_stem: "layout".to_string(),
            formats: vec![ExportFormat::StlAscii, ExportFormat::Dxf, ExportFormat::Svg],
        }
    }
}

/// Everything in `tubekit.ron`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub services: ServiceConfig,
    pub editor: EditorSettings,
    pub export: ExportConfig,
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Owns the loaded configuration and the file it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    path: PathBuf,
}

impl ConfigManager {
    /// Defaults bound to `path`, nothing read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config: AppConfig::default(),
            path: path.into(),
        }
    }

    /// Read `path`; a missing file yields the defaults
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::new(path));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: AppConfig =
            ron::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(Self { config, path })
    }

    /// Like [`load`](Self::load), but a broken file only warns
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(manager) => manager,
            Err(e) => {
                tracing::warn!("Failed to load config {}: {}", path.display(), e);
                Self::new(path)
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::info!("Saved config to {}", self.path.display());
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::default();
    }
}

/// Configuration shared between threads
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

pub fn create_shared_config(manager: ConfigManager) -> SharedConfig {
    Arc::new(RwLock::new(manager))
}
