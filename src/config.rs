//=========================================================================
// Stage Configuration
//=========================================================================
//
// Project settings read at startup: window, frame rate, main scene.
//
// Stored as RON. Missing fields fall back to their defaults, so a config
// file only needs the values it changes:
//
// ```ron
// (
//     title: "Flappy",
//     window_size: (width: 288, height: 512),
//     main_scene: "title",
// )
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::render::{Color, Size};

//=== ConfigError =========================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed fine but cannot drive the stage.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

//=== StageConfig =========================================================

/// Stage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Window title.
    pub title: String,

    /// Initial window size in pixels.
    pub window_size: Size,

    /// Target frames per second.
    pub fps: u32,

    /// Enables debug logging when no explicit filter is set.
    pub debug: bool,

    pub fullscreen: bool,

    /// Scene the stack is reset to on start.
    pub main_scene: String,

    /// Default scene background.
    pub background: Color,

    /// `env_logger` filter, e.g. "info" or "aetheric_stage=debug".
    pub log_filter: Option<String>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            title: "Aetheric Stage".to_owned(),
            window_size: Size::new(560, 480),
            fps: 60,
            debug: false,
            fullscreen: false,
            main_scene: "main".to_owned(),
            background: Color::BLACK,
            log_filter: None,
        }
    }
}

impl StageConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads and validates a `.ron` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        ensure_ron(path)?;

        let contents = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&contents)?;
        config.validate()?;

        debug!("Loaded stage config from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty-printed RON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_ron(path)?;

        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    //--- Validation -------------------------------------------------------

    /// Rejects settings the frame driver cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if self.window_size.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has no area",
                self.window_size.width, self.window_size.height
            )));
        }
        if self.main_scene.is_empty() {
            return Err(ConfigError::Invalid("main scene name is empty".into()));
        }
        Ok(())
    }

    /// Log filter implied by these settings.
    ///
    /// An explicit `log_filter` wins; otherwise `debug` selects "debug".
    pub fn effective_log_filter(&self) -> Option<String> {
        match (&self.log_filter, self.debug) {
            (Some(filter), _) => Some(filter.clone()),
            (None, true) => Some("debug".to_owned()),
            (None, false) => None,
        }
    }
}

fn ensure_ron(path: &Path) -> Result<(), ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
