//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 提示音频缓存配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 请求归一化配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节），base64 音频会让请求体变大
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9010
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024 // 64 MiB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 引擎类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 通过 HTTP 调用推理服务
    #[default]
    Http,
    /// 固定音频，用于联调
    Fake,
}

/// 合成引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub kind: EngineKind,

    /// 推理服务基础 URL
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// 单次推理超时（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// fake 引擎返回的音频文件
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,

    /// fake 引擎模拟延迟（毫秒）
    #[serde(default)]
    pub fake_delay_ms: u64,
}

fn default_engine_url() -> String {
    "http://127.0.0.1:9020".to_string()
}

fn default_engine_timeout() -> u64 {
    600 // 长文本推理可能需要数分钟
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            url: default_engine_url(),
            timeout_secs: default_engine_timeout(),
            fake_audio_path: None,
            fake_delay_ms: 0,
        }
    }
}

/// 提示音频缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 缓存目录，首次写入时创建
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// 缓存文件扩展名
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// 默认缓存目录：`<系统临时目录>/indextts/prompts`
pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("indextts").join("prompts")
}

fn default_extension() -> String {
    "wav".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            extension: default_extension(),
        }
    }
}

/// 请求归一化配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 参考音频情感权重的缩放系数
    #[serde(default = "default_emotion_weight_scale")]
    pub emotion_weight_scale: f64,

    /// 未指定时每段最大文本 token 数
    #[serde(default = "default_max_text_tokens")]
    pub default_max_text_tokens: u32,
}

fn default_emotion_weight_scale() -> f64 {
    0.8
}

fn default_max_text_tokens() -> u32 {
    120
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            emotion_weight_scale: default_emotion_weight_scale(),
            default_max_text_tokens: default_max_text_tokens(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
