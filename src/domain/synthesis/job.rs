//! Synthesis Context - SynthesisJob

use uuid::Uuid;

use super::{AudioPayload, GenerationParams};
use crate::domain::emotion::EmotionVector;

/// 默认每段最大文本 token 数
pub const DEFAULT_MAX_TEXT_TOKENS_PER_SEGMENT: u32 = 120;

/// 情感控制模式
///
/// 每个变体只携带自己的字段，非法字段组合不可表示
#[derive(Debug, Clone, PartialEq)]
pub enum JobMode {
    /// 仅音色克隆，不做情感控制
    Speaker,
    /// 参考音频驱动情感
    ReferenceAudio {
        emotion_audio: AudioPayload,
        /// 缩放后的情感强度（emotion_weight * scale）
        emo_alpha: f64,
    },
    /// 显式情感向量
    EmotionVector {
        vector: EmotionVector,
        use_random: bool,
    },
    /// 文本描述情感，None 表示由引擎从合成文本推断
    EmotionText {
        emotion_text: Option<String>,
        use_random: bool,
    },
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Speaker => "speaker",
            JobMode::ReferenceAudio { .. } => "reference",
            JobMode::EmotionVector { .. } => "vector",
            JobMode::EmotionText { .. } => "text",
        }
    }
}

/// 一次规范化后的合成任务
///
/// 不变量:
/// - text 非空
/// - max_text_tokens_per_segment > 0
/// - generation 已通过范围校验
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisJob {
    pub job_id: Uuid,
    pub mode: JobMode,
    pub speaker_prompt: AudioPayload,
    pub text: String,
    pub max_text_tokens_per_segment: u32,
    pub generation: GenerationParams,
}

impl SynthesisJob {
    pub fn new(
        mode: JobMode,
        speaker_prompt: AudioPayload,
        text: String,
        max_text_tokens_per_segment: u32,
        generation: GenerationParams,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            mode,
            speaker_prompt,
            text,
            max_text_tokens_per_segment,
            generation,
        }
    }
}
