//! Fake Synthesis Engine - 用于测试和本地联调的引擎
//!
//! 不做真实推理，始终返回固定音频

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{EngineError, EngineOutput, EngineRequest, SynthesisEnginePort};

/// Fake 引擎配置
#[derive(Debug, Clone, Default)]
pub struct FakeEngineConfig {
    /// 固定返回的音频文件；None 时返回内置的静音 WAV
    pub audio_file_path: Option<PathBuf>,
    /// 模拟推理延迟（毫秒）
    pub delay_ms: u64,
    /// 始终返回失败
    pub fail: bool,
}

/// Fake 合成引擎
pub struct FakeSynthesisEngine {
    config: FakeEngineConfig,
    /// 缓存的音频数据
    audio_data: Vec<u8>,
}

impl FakeSynthesisEngine {
    pub fn new(config: FakeEngineConfig) -> Result<Self, std::io::Error> {
        let audio_data = match &config.audio_file_path {
            Some(path) => std::fs::read(path)?,
            None => silent_wav(22050, 500),
        };
        tracing::info!(
            path = ?config.audio_file_path,
            audio_size = audio_data.len(),
            delay_ms = config.delay_ms,
            "FakeSynthesisEngine initialized"
        );
        Ok(Self { config, audio_data })
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self {
            config: FakeEngineConfig::default(),
            audio_data: silent_wav(22050, 500),
        }
    }

    pub fn audio_data(&self) -> &[u8] {
        &self.audio_data
    }
}

#[async_trait]
impl SynthesisEnginePort for FakeSynthesisEngine {
    async fn synthesize(&self, request: EngineRequest) -> Result<EngineOutput, EngineError> {
        tracing::debug!(
            text_len = request.text.len(),
            prompt = %request.spk_audio_prompt.display(),
            "FakeSynthesisEngine: returning fixed audio"
        );

        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }

        if self.config.fail {
            return Err(EngineError::Failure("fake engine failure".to_string()));
        }

        Ok(EngineOutput {
            audio_data: self.audio_data.clone(),
        })
    }
}

/// 生成 16-bit 单声道静音 WAV
pub fn silent_wav(sample_rate: u32, duration_ms: u32) -> Vec<u8> {
    let num_samples = sample_rate as u64 * duration_ms as u64 / 1000;
    let data_len = (num_samples * 2) as u32;
    let byte_rate = sample_rate * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::GenerationParams;

    fn request() -> EngineRequest {
        EngineRequest {
            spk_audio_prompt: PathBuf::from("/tmp/p.wav"),
            text: "hello".to_string(),
            emo_audio_prompt: None,
            emo_alpha: 1.0,
            emo_vector: None,
            use_emo_text: false,
            emo_text: None,
            use_random: false,
            max_text_tokens_per_segment: 120,
            generation: GenerationParams::default(),
        }
    }

    #[test]
    fn test_silent_wav_header() {
        let wav = silent_wav(22050, 1000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 22050 * 2);
    }

    #[tokio::test]
    async fn test_returns_fixed_audio() {
        let engine = FakeSynthesisEngine::with_defaults();
        let output = engine.synthesize(request()).await.unwrap();
        assert_eq!(output.audio_data, engine.audio_data());
    }

    #[tokio::test]
    async fn test_file_audio_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixed.wav");
        std::fs::write(&path, b"fixed audio").unwrap();

        let engine = FakeSynthesisEngine::new(FakeEngineConfig {
            audio_file_path: Some(path),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(engine.synthesize(request()).await.unwrap().audio_data, b"fixed audio");

        let failing = FakeSynthesisEngine::new(FakeEngineConfig {
            fail: true,
            ..Default::default()
        })
        .unwrap();
        assert!(failing.synthesize(request()).await.is_err());
    }
}
