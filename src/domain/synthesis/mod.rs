//! Synthesis Context - 合成任务限界上下文
//!
//! 职责:
//! - SynthesisJob 规范化模型
//! - 音频载荷与内容哈希
//! - 引擎生成参数

mod job;
mod value_objects;

pub use job::{JobMode, SynthesisJob, DEFAULT_MAX_TEXT_TOKENS_PER_SEGMENT};
pub use value_objects::{
    encode_base64, AudioPayload, ContentHash, GenerationParams, InvalidBase64,
};
