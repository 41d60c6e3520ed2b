//! SpeechGate - IndexTTS 合成服务的准入、规范化与提示音频缓存层
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Emotion: 情感向量归一化
//! - Synthesis: 合成任务、音频载荷、内容哈希
//!
//! 应用层 (application/):
//! - Ports: 端口定义（AdmissionGate, AssetStore, SynthesisEngine）
//! - Commands: 四种合成请求，RequestNormalizer 与 SynthesisCoordinator
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API
//! - Memory: 单槽准入门
//! - Adapters: 内容寻址文件缓存、HTTP / Fake 合成引擎
//!
//! 客户端 (client/): 带 BUSY 退避重试的 SynthesisClient

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
