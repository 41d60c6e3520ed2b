//! Synthesize Commands - 四种合成请求形态
//!
//! 字段均为 Option，由 RequestNormalizer 区分"缺失"与"非法"

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::synthesis::GenerationParams;

/// 四种请求共享的字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesisBase {
    /// 音色参考音频（base64）
    pub prompt_audio: Option<String>,
    pub text: Option<String>,
    pub max_text_tokens_per_segment: Option<i64>,
    /// 缺省时全部使用默认值；部分字段缺省时该字段使用默认值
    pub generation_args: Option<GenerationParams>,
}

/// 仅音色克隆
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesizeSpeaker {
    #[serde(flatten)]
    pub base: SynthesisBase,
}

/// 参考音频情感
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesizeReference {
    #[serde(flatten)]
    pub base: SynthesisBase,
    /// 情感参考音频（base64）
    pub emotion_audio: Option<String>,
    /// 情感权重 [0, 1]，默认 0.8
    pub emotion_weight: Option<f64>,
}

/// 情感向量
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesizeVector {
    #[serde(flatten)]
    pub base: SynthesisBase,
    /// 8 个命名情感因子，值为数字或数字字符串
    pub emotion_factors: Option<Map<String, Value>>,
    pub emotion_random: Option<bool>,
}

/// 文本情感描述
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesizeText {
    #[serde(flatten)]
    pub base: SynthesisBase,
    /// null 或缺省表示由引擎从合成文本推断情感；空字符串非法
    pub emotion_text: Option<String>,
    pub emotion_random: Option<bool>,
}

/// 合成命令
#[derive(Debug, Clone)]
pub enum SynthesizeCommand {
    Speaker(SynthesizeSpeaker),
    Reference(SynthesizeReference),
    Vector(SynthesizeVector),
    Text(SynthesizeText),
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub job_id: uuid::Uuid,
    /// 引擎产出的音频，原样返回
    pub audio_data: Vec<u8>,
    pub elapsed_ms: u64,
}
