use calc_engine::EngineConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LoggingFormatConfig,
    #[serde(default)]
    pub levels: LoggingLevelsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingFormatConfig {
    #[serde(default = "true_default")]
    pub show_time: bool,
    #[serde(default)]
    pub location: LoggingLocationConfig,
}

impl Default for LoggingFormatConfig {
    fn default() -> Self {
        Self {
            show_time: true,
            location: LoggingLocationConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingLocationConfig {
    #[serde(default)]
    pub show_file: bool,
    #[serde(default)]
    pub show_line: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLevelsConfig {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub info: bool,
    #[serde(default = "true_default")]
    pub warning: bool,
    #[serde(default = "true_default")]
    pub error: bool,
}

impl Default for LoggingLevelsConfig {
    fn default() -> Self {
        Self {
            debug: false,
            info: false,
            warning: true,
            error: true,
        }
    }
}

fn true_default() -> bool {
    true
}

static CONFIG: RwLock<Option<&'static AppConfig>> = RwLock::new(None);

/// Load the config once and hand out the cached copy afterwards.
pub fn get_config() -> Result<&'static AppConfig, ConfigError> {
    if let Some(cfg) = *CONFIG.read().unwrap_or_else(|e| e.into_inner()) {
        return Ok(cfg);
    }

    let mut write = CONFIG.write().unwrap_or_else(|e| e.into_inner());
    if let Some(cfg) = *write {
        return Ok(cfg);
    }

    let cfg: &'static AppConfig = Box::leak(Box::new(load_config()?));
    *write = Some(cfg);
    Ok(cfg)
}

#[cfg(test)]
pub fn reset_config() {
    let mut write = CONFIG.write().unwrap();
    *write = None;
}

/// Prefer files next to the crate manifest (cargo run / cargo test), fall
/// back to the working directory.
fn locate(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let in_manifest = Path::new(&manifest_dir).join(name);
    if in_manifest.exists() {
        in_manifest
    } else {
        PathBuf::from(name)
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        // Shipped defaults
        .add_source(File::from(locate("global_config.yaml")).required(false))
        // Deployment overrides
        .add_source(File::from(locate("production_config.yaml")).required(false))
        // Local, untracked overrides
        .add_source(File::from(locate(".global_config.yaml")).required(false))
        // Nested env vars like CALC__ENGINE__PRECISION=4
        .add_source(
            Environment::with_prefix("CALC")
                .separator("__")
                .try_parsing(true),
        );

    builder.build()?.try_deserialize()
}
