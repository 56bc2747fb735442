//=========================================================================
// Logging
//=========================================================================
//
// One-shot `env_logger` setup for binaries built on the stage.
//
// Filter precedence: explicit `env_filter`, then `RUST_LOG`, then info.
//
//=========================================================================

use std::sync::Once;

use crate::config::StageConfig;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "aetheric_stage=debug,winit=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl From<&StageConfig> for LoggingConfig {
    fn from(config: &StageConfig) -> Self {
        Self {
            env_filter: config.effective_log_filter(),
            ..Self::default()
        }
    }
}

//=== init_logging() ======================================================

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
///
/// Call early in `main`. Fails silently if another logger was installed
/// first.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
