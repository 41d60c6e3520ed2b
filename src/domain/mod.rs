//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Synthesis Context: 合成任务、音频载荷、生成参数
//! - Emotion Context: 情感向量归一化

pub mod emotion;
pub mod synthesis;
