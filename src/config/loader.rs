//! Configuration Loader
//!
//! 多源配置加载与合并
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{default_cache_dir, AppConfig, EngineKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 缓存目录的兼容环境变量，优先级低于配置文件和 `SPEECHGATE_STORAGE__CACHE_DIR`
const PROMPT_CACHE_DIR_ENV: &str = "PROMPT_CACHE_DIR";

/// 加载应用配置
///
/// # 环境变量示例
/// - `SPEECHGATE_SERVER__PORT=9010`
/// - `SPEECHGATE_ENGINE__URL=http://gpu-box:9020`
/// - `SPEECHGATE_ENGINE__KIND=fake`
/// - `SPEECHGATE_STORAGE__CACHE_DIR=/data/prompts`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索当前目录下的 config / config.local
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let cache_dir = std::env::var(PROMPT_CACHE_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .unwrap_or_else(|| default_cache_dir().to_string_lossy().into_owned());

    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 9010)?
        .set_default("server.max_body_bytes", 64_i64 * 1024 * 1024)?
        .set_default("engine.kind", "http")?
        .set_default("engine.url", "http://127.0.0.1:9020")?
        .set_default("engine.timeout_secs", 600)?
        .set_default("engine.fake_delay_ms", 0)?
        .set_default("storage.cache_dir", cache_dir)?
        .set_default("storage.extension", "wav")?
        .set_default("synthesis.emotion_weight_scale", 0.8)?
        .set_default("synthesis.default_max_text_tokens", 120)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: SPEECHGATE_ENGINE__URL=http://gpu-box:9020
    builder = builder.add_source(
        Environment::with_prefix("SPEECHGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.engine.kind == EngineKind::Http && config.engine.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine URL cannot be empty".to_string(),
        ));
    }

    if config.storage.extension.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache file extension cannot be empty".to_string(),
        ));
    }

    let scale = config.synthesis.emotion_weight_scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "Emotion weight scale must be positive, got {}",
            scale
        )));
    }

    if config.synthesis.default_max_text_tokens == 0 {
        return Err(ConfigError::ValidationError(
            "Default max text tokens per segment cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body: {} bytes", config.server.max_body_bytes);
    tracing::info!("Engine: {:?}", config.engine.kind);
    match config.engine.kind {
        EngineKind::Http => {
            tracing::info!("Engine URL: {}", config.engine.url);
            tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
        }
        EngineKind::Fake => {
            tracing::info!("Fake Audio: {:?}", config.engine.fake_audio_path);
            tracing::info!("Fake Delay: {}ms", config.engine.fake_delay_ms);
        }
    }
    tracing::info!("Prompt Cache: {:?}", config.storage.cache_dir);
    tracing::info!("Emotion Weight Scale: {}", config.synthesis.emotion_weight_scale);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
