//! Configuration management for the FraudShield service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub ui: UiConfig,
    pub session: SessionConfig,
    pub animations: AnimationConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Dashboard behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Pause before classification, in milliseconds
    pub processing_delay_ms: u64,
}

impl UiConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

/// Per-session state limits
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Maximum history records per session, 0 for unbounded
    pub max_history: usize,
    /// Sessions idle longer than this are dropped
    pub idle_timeout_secs: u64,
    /// Live sessions kept at most; the least recently seen is evicted
    pub max_sessions: usize,
}

impl SessionConfig {
    /// History capacity, `None` when unbounded
    pub fn history_capacity(&self) -> Option<usize> {
        (self.max_history > 0).then_some(self.max_history)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Session limit, at least one
    pub fn session_limit(&self) -> usize {
        self.max_sessions.max(1)
    }
}

/// Decorative animation assets
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    /// Skip all remote fetches when false
    pub enabled: bool,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    pub header_url: String,
    pub safe_url: String,
    pub alert_url: String,
    pub logo_url: String,
}

impl AnimationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path.
    ///
    /// Built-in defaults are layered under the file, and `FRAUDSHIELD__*`
    /// environment variables over it. A missing file is not an error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8501_i64)?
            .set_default("model.path", "models/model.onnx")?
            .set_default("model.onnx_threads", 1_i64)?
            .set_default("ui.processing_delay_ms", 900_i64)?
            .set_default("session.max_history", 500_i64)?
            .set_default("session.idle_timeout_secs", 3600_i64)?
            .set_default("session.max_sessions", 10_000_i64)?
            .set_default("animations.enabled", true)?
            .set_default("animations.timeout_ms", 5000_i64)?
            .set_default("animations.header_url", HEADER_ANIMATION_URL)?
            .set_default("animations.safe_url", SAFE_ANIMATION_URL)?
            .set_default("animations.alert_url", ALERT_ANIMATION_URL)?
            .set_default("animations.logo_url", LOGO_ANIMATION_URL)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("FRAUDSHIELD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

const HEADER_ANIMATION_URL: &str = "https://assets10.lottiefiles.com/packages/lf20_w51pcehl.json";
const SAFE_ANIMATION_URL: &str = "https://assets9.lottiefiles.com/private_files/lf30_p5tali1o.json";
const ALERT_ANIMATION_URL: &str = "https://assets7.lottiefiles.com/packages/lf20_7fCbvNSmFD.json";
const LOGO_ANIMATION_URL: &str = "https://assets5.lottiefiles.com/packages/lf20_V9t630.json";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8501,
            },
            model: ModelConfig {
                path: "models/model.onnx".to_string(),
                onnx_threads: 1,
            },
            ui: UiConfig {
                processing_delay_ms: 900,
            },
            session: SessionConfig {
                max_history: 500,
                idle_timeout_secs: 3600,
                max_sessions: 10_000,
            },
            animations: AnimationConfig {
                enabled: true,
                timeout_ms: 5000,
                header_url: HEADER_ANIMATION_URL.to_string(),
                safe_url: SAFE_ANIMATION_URL.to_string(),
                alert_url: ALERT_ANIMATION_URL.to_string(),
                logo_url: LOGO_ANIMATION_URL.to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
