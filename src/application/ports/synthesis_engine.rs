//! Synthesis Engine Port - 语音合成引擎抽象
//!
//! 定义合成引擎的抽象接口，具体实现在 infrastructure/adapters/engine 层

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::synthesis::GenerationParams;

/// 引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Engine failure: {0}")]
    Failure(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 规范化后的引擎调用参数
///
/// 四种请求形态最终都落到这一个结构
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineRequest {
    /// 音色参考音频路径
    pub spk_audio_prompt: PathBuf,
    pub text: String,
    /// 情感参考音频路径（仅 reference 模式）
    pub emo_audio_prompt: Option<PathBuf>,
    pub emo_alpha: f64,
    pub emo_vector: Option<Vec<f64>>,
    pub use_emo_text: bool,
    pub emo_text: Option<String>,
    pub use_random: bool,
    pub max_text_tokens_per_segment: u32,
    #[serde(flatten)]
    pub generation: GenerationParams,
}

/// 引擎输出
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// 完整音频数据（WAV）
    pub audio_data: Vec<u8>,
}

/// Synthesis Engine Port
///
/// 单一、昂贵、有状态的合成引擎；调用方负责保证同一时刻只有一个任务
#[async_trait]
pub trait SynthesisEnginePort: Send + Sync {
    /// 执行合成
    async fn synthesize(&self, request: EngineRequest) -> Result<EngineOutput, EngineError>;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
