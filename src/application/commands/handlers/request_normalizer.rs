//! Request Normalizer - 请求校验与规范化
//!
//! 将四种请求形态统一为 SynthesisJob；所有校验都在准入门和引擎之前完成

use serde_json::{Map, Value};

use crate::application::commands::synthesize_commands::*;
use crate::application::error::ApplicationError;
use crate::domain::emotion::{EmotionFactors, EMOTION_DIMENSIONS, EMOTION_NAMES};
use crate::domain::synthesis::{
    AudioPayload, GenerationParams, JobMode, SynthesisJob, DEFAULT_MAX_TEXT_TOKENS_PER_SEGMENT,
};

/// 默认情感权重
pub const DEFAULT_EMOTION_WEIGHT: f64 = 0.8;

/// 情感权重的 UX 缩放系数
pub const DEFAULT_EMOTION_WEIGHT_SCALE: f64 = 0.8;

/// 规范化配置
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// emo_alpha = emotion_weight * emotion_weight_scale
    pub emotion_weight_scale: f64,
    /// 请求未指定时的每段最大 token 数
    pub default_max_text_tokens: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            emotion_weight_scale: DEFAULT_EMOTION_WEIGHT_SCALE,
            default_max_text_tokens: DEFAULT_MAX_TEXT_TOKENS_PER_SEGMENT,
        }
    }
}

/// 共享字段规范化结果
struct NormalizedBase {
    speaker_prompt: AudioPayload,
    text: String,
    max_text_tokens_per_segment: u32,
    generation: GenerationParams,
}

/// RequestNormalizer
pub struct RequestNormalizer {
    config: NormalizerConfig,
}

impl RequestNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, cmd: SynthesizeCommand) -> Result<SynthesisJob, ApplicationError> {
        match cmd {
            SynthesizeCommand::Speaker(cmd) => self.speaker(cmd),
            SynthesizeCommand::Reference(cmd) => self.reference(cmd),
            SynthesizeCommand::Vector(cmd) => self.vector(cmd),
            SynthesizeCommand::Text(cmd) => self.text(cmd),
        }
    }

    pub fn speaker(&self, cmd: SynthesizeSpeaker) -> Result<SynthesisJob, ApplicationError> {
        let base = self.normalize_base(cmd.base)?;
        Ok(Self::build(JobMode::Speaker, base))
    }

    pub fn reference(&self, cmd: SynthesizeReference) -> Result<SynthesisJob, ApplicationError> {
        let base = self.normalize_base(cmd.base)?;
        let emotion_audio = decode_audio("emotion_audio", cmd.emotion_audio)?;

        let weight = cmd.emotion_weight.unwrap_or(DEFAULT_EMOTION_WEIGHT);
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(ApplicationError::invalid(
                "emotion_weight",
                "must be a number in [0, 1]",
            ));
        }

        let mode = JobMode::ReferenceAudio {
            emotion_audio,
            emo_alpha: weight * self.config.emotion_weight_scale,
        };
        Ok(Self::build(mode, base))
    }

    pub fn vector(&self, cmd: SynthesizeVector) -> Result<SynthesisJob, ApplicationError> {
        let base = self.normalize_base(cmd.base)?;
        let factors = cmd
            .emotion_factors
            .ok_or_else(|| ApplicationError::missing("emotion_factors"))?;
        let factors = parse_emotion_factors(&factors)?;

        let mode = JobMode::EmotionVector {
            vector: factors.normalize(),
            use_random: cmd.emotion_random.unwrap_or(false),
        };
        Ok(Self::build(mode, base))
    }

    pub fn text(&self, cmd: SynthesizeText) -> Result<SynthesisJob, ApplicationError> {
        let base = self.normalize_base(cmd.base)?;
        if cmd.emotion_text.as_deref() == Some("") {
            return Err(ApplicationError::invalid("emotion_text", "cannot be empty"));
        }

        let mode = JobMode::EmotionText {
            emotion_text: cmd.emotion_text,
            use_random: cmd.emotion_random.unwrap_or(false),
        };
        Ok(Self::build(mode, base))
    }

    fn normalize_base(&self, base: SynthesisBase) -> Result<NormalizedBase, ApplicationError> {
        let speaker_prompt = decode_audio("prompt_audio", base.prompt_audio)?;

        let text = base.text.ok_or_else(|| ApplicationError::missing("text"))?;
        if text.trim().is_empty() {
            return Err(ApplicationError::invalid("text", "must not be empty"));
        }

        let max_text_tokens_per_segment = match base.max_text_tokens_per_segment {
            None => self.config.default_max_text_tokens,
            Some(n) if n > 0 => u32::try_from(n).map_err(|_| {
                ApplicationError::invalid("max_text_tokens_per_segment", "too large")
            })?,
            Some(_) => {
                return Err(ApplicationError::invalid(
                    "max_text_tokens_per_segment",
                    "must be a positive integer",
                ))
            }
        };

        let generation = base.generation_args.unwrap_or_default();
        generation.validate().map_err(|(field, reason)| {
            ApplicationError::invalid(format!("generation_args.{}", field), reason)
        })?;

        Ok(NormalizedBase {
            speaker_prompt,
            text,
            max_text_tokens_per_segment,
            generation,
        })
    }

    fn build(mode: JobMode, base: NormalizedBase) -> SynthesisJob {
        SynthesisJob::new(
            mode,
            base.speaker_prompt,
            base.text,
            base.max_text_tokens_per_segment,
            base.generation,
        )
    }
}

impl Default for RequestNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

/// 解码 base64 音频字段
fn decode_audio(field: &str, value: Option<String>) -> Result<AudioPayload, ApplicationError> {
    let encoded = value.ok_or_else(|| ApplicationError::missing(field))?;
    let data = AudioPayload::decode_base64(&encoded).map_err(|e| {
        ApplicationError::InvalidEncoding {
            field: field.to_string(),
            reason: e.0,
        }
    })?;
    AudioPayload::new(data).ok_or_else(|| ApplicationError::invalid(field, "audio must not be empty"))
}

/// 按固定顺序解析 8 个情感因子
///
/// 所有因子必填；接受数字或数字字符串；拒绝负数和非有限值
fn parse_emotion_factors(factors: &Map<String, Value>) -> Result<EmotionFactors, ApplicationError> {
    let mut values = [0.0; EMOTION_DIMENSIONS];
    for (i, name) in EMOTION_NAMES.iter().enumerate() {
        let field = format!("emotion_factors.{}", name);
        let raw = factors
            .get(*name)
            .ok_or_else(|| ApplicationError::missing(field.clone()))?;

        let value = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApplicationError::invalid(field.clone(), "must be a number"))?;

        if value < 0.0 {
            return Err(ApplicationError::invalid(field, "must be >= 0"));
        }
        values[i] = value;
    }
    Ok(EmotionFactors::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::encode_base64;
    use serde_json::json;

    fn base() -> SynthesisBase {
        SynthesisBase {
            prompt_audio: Some(encode_base64(b"RIFF....WAVEfmt ")),
            text: Some("hello".to_string()),
            max_text_tokens_per_segment: None,
            generation_args: None,
        }
    }

    fn factors(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn all_zero_factors() -> Map<String, Value> {
        factors(json!({
            "happy": 0, "angry": 0, "sad": 0, "afraid": 0,
            "disgusted": 0, "melancholic": 0, "surprised": 0, "calm": 0
        }))
    }

    #[test]
    fn test_speaker_defaults() {
        let job = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: base() })
            .unwrap();
        assert_eq!(job.mode, JobMode::Speaker);
        assert_eq!(job.text, "hello");
        assert_eq!(job.max_text_tokens_per_segment, 120);
        assert_eq!(job.generation, GenerationParams::default());
        assert_eq!(job.speaker_prompt.data(), b"RIFF....WAVEfmt ");
    }

    #[test]
    fn test_missing_prompt_audio() {
        let mut b = base();
        b.prompt_audio = None;
        let err = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: b })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::MissingField(ref f) if f == "prompt_audio"));
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_invalid_base64_prompt() {
        let mut b = base();
        b.prompt_audio = Some("%%%not-base64%%%".to_string());
        let err = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: b })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidEncoding { .. }));
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_empty_prompt_audio_rejected() {
        let mut b = base();
        b.prompt_audio = Some(String::new());
        let err = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: b })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidField { ref field, .. } if field == "prompt_audio"));
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut b = base();
        b.text = Some("   ".to_string());
        let err = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: b })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidField { ref field, .. } if field == "text"));

        let mut b = base();
        b.text = None;
        let err = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: b })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::MissingField(ref f) if f == "text"));
    }

    #[test]
    fn test_non_positive_max_tokens_rejected() {
        for n in [0, -5] {
            let mut b = base();
            b.max_text_tokens_per_segment = Some(n);
            let err = RequestNormalizer::default()
                .speaker(SynthesizeSpeaker { base: b })
                .unwrap_err();
            assert!(err.is_bad_request());
        }
    }

    #[test]
    fn test_generation_range_rejected() {
        let mut b = base();
        b.generation_args = Some(GenerationParams {
            top_k: 0,
            ..Default::default()
        });
        let err = RequestNormalizer::default()
            .speaker(SynthesizeSpeaker { base: b })
            .unwrap_err();
        assert!(
            matches!(err, ApplicationError::InvalidField { ref field, .. } if field == "generation_args.top_k")
        );
    }

    #[test]
    fn test_reference_scales_weight() {
        let job = RequestNormalizer::default()
            .reference(SynthesizeReference {
                base: base(),
                emotion_audio: Some(encode_base64(b"emo-audio")),
                emotion_weight: Some(1.0),
            })
            .unwrap();
        match job.mode {
            JobMode::ReferenceAudio {
                emotion_audio,
                emo_alpha,
            } => {
                assert_eq!(emotion_audio.data(), b"emo-audio");
                assert!((emo_alpha - 0.8).abs() < 1e-12);
            }
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[test]
    fn test_reference_default_weight() {
        let job = RequestNormalizer::default()
            .reference(SynthesizeReference {
                base: base(),
                emotion_audio: Some(encode_base64(b"emo-audio")),
                emotion_weight: None,
            })
            .unwrap();
        assert!(matches!(
            job.mode,
            JobMode::ReferenceAudio { emo_alpha, .. } if (emo_alpha - 0.64).abs() < 1e-12
        ));
    }

    #[test]
    fn test_reference_custom_scale() {
        let normalizer = RequestNormalizer::new(NormalizerConfig {
            emotion_weight_scale: 1.0,
            ..Default::default()
        });
        let job = normalizer
            .reference(SynthesizeReference {
                base: base(),
                emotion_audio: Some(encode_base64(b"emo-audio")),
                emotion_weight: Some(0.5),
            })
            .unwrap();
        assert!(matches!(
            job.mode,
            JobMode::ReferenceAudio { emo_alpha, .. } if (emo_alpha - 0.5).abs() < 1e-12
        ));
    }

    #[test]
    fn test_reference_requires_emotion_audio_and_valid_weight() {
        let err = RequestNormalizer::default()
            .reference(SynthesizeReference {
                base: base(),
                emotion_audio: None,
                emotion_weight: Some(0.5),
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::MissingField(ref f) if f == "emotion_audio"));

        let err = RequestNormalizer::default()
            .reference(SynthesizeReference {
                base: base(),
                emotion_audio: Some(encode_base64(b"emo-audio")),
                emotion_weight: Some(1.5),
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidField { ref field, .. } if field == "emotion_weight"));
    }

    #[test]
    fn test_vector_single_factor() {
        let mut f = all_zero_factors();
        f.insert("happy".to_string(), json!(1));
        let job = RequestNormalizer::default()
            .vector(SynthesizeVector {
                base: base(),
                emotion_factors: Some(f),
                emotion_random: Some(true),
            })
            .unwrap();
        match job.mode {
            JobMode::EmotionVector { vector, use_random } => {
                assert_eq!(vector.values(), &[0.75, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
                assert!(use_random);
            }
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[test]
    fn test_vector_accepts_numeric_strings() {
        let mut f = all_zero_factors();
        f.insert("surprised".to_string(), json!("1.0"));
        let job = RequestNormalizer::default()
            .vector(SynthesizeVector {
                base: base(),
                emotion_factors: Some(f),
                emotion_random: None,
            })
            .unwrap();
        assert!(matches!(
            job.mode,
            JobMode::EmotionVector { vector, use_random: false } if vector.values()[6] == 0.55
        ));
    }

    #[test]
    fn test_vector_huge_factors_capped_at_ceiling() {
        let mut f = all_zero_factors();
        for name in EMOTION_NAMES {
            f.insert(name.to_string(), json!(1.7e308));
        }
        let job = RequestNormalizer::default()
            .vector(SynthesizeVector {
                base: base(),
                emotion_factors: Some(f),
                emotion_random: None,
            })
            .unwrap();
        match job.mode {
            JobMode::EmotionVector { vector, .. } => {
                assert!((vector.sum() - 0.8).abs() < 1e-9);
                assert!(vector.values().iter().all(|c| *c > 0.0));
            }
            other => panic!("unexpected mode: {:?}", other),
        }
    }

    #[test]
    fn test_vector_missing_each_factor_rejected() {
        for name in EMOTION_NAMES {
            let mut f = all_zero_factors();
            f.remove(name);
            let err = RequestNormalizer::default()
                .vector(SynthesizeVector {
                    base: base(),
                    emotion_factors: Some(f),
                    emotion_random: None,
                })
                .unwrap_err();
            let expected = format!("emotion_factors.{}", name);
            assert!(matches!(err, ApplicationError::MissingField(ref f) if *f == expected));
        }
    }

    #[test]
    fn test_vector_malformed_and_negative_factors_rejected() {
        for bad in [json!("abc"), json!(null), json!([1]), json!(-0.5)] {
            let mut f = all_zero_factors();
            f.insert("calm".to_string(), bad);
            let err = RequestNormalizer::default()
                .vector(SynthesizeVector {
                    base: base(),
                    emotion_factors: Some(f),
                    emotion_random: None,
                })
                .unwrap_err();
            assert!(
                matches!(err, ApplicationError::InvalidField { ref field, .. } if field == "emotion_factors.calm")
            );
        }
    }

    #[test]
    fn test_vector_missing_factors_object() {
        let err = RequestNormalizer::default()
            .vector(SynthesizeVector {
                base: base(),
                emotion_factors: None,
                emotion_random: None,
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::MissingField(ref f) if f == "emotion_factors"));
    }

    #[test]
    fn test_text_mode_variants() {
        let normalizer = RequestNormalizer::default();

        let job = normalizer
            .text(SynthesizeText {
                base: base(),
                emotion_text: Some("极度悲伤".to_string()),
                emotion_random: None,
            })
            .unwrap();
        assert_eq!(
            job.mode,
            JobMode::EmotionText {
                emotion_text: Some("极度悲伤".to_string()),
                use_random: false
            }
        );

        let job = normalizer
            .text(SynthesizeText {
                base: base(),
                emotion_text: None,
                emotion_random: Some(true),
            })
            .unwrap();
        assert_eq!(
            job.mode,
            JobMode::EmotionText {
                emotion_text: None,
                use_random: true
            }
        );

        let err = normalizer
            .text(SynthesizeText {
                base: base(),
                emotion_text: Some(String::new()),
                emotion_random: None,
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidField { ref field, .. } if field == "emotion_text"));
    }

    #[test]
    fn test_commands_deserialize_from_wire() {
        let cmd: SynthesizeText = serde_json::from_value(json!({
            "prompt_audio": "aGVsbG8=",
            "text": "hi",
            "emotion_text": null,
            "generation_args": {"num_beams": 1}
        }))
        .unwrap();
        assert!(cmd.emotion_text.is_none());
        assert_eq!(cmd.base.generation_args.unwrap().num_beams, 1);
        assert_eq!(cmd.base.generation_args.unwrap().top_k, 30);
    }
}
