//! Synthesis Coordinator - 单次合成请求的端到端编排
//!
//! normalize -> try_acquire -> 落盘音频 -> 调用引擎 -> 释放准入门 -> 返回音频

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::handlers::RequestNormalizer;
use crate::application::commands::synthesize_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AdmissionGatePort, AssetStorePort, EngineRequest, SynthesisEnginePort,
};
use crate::domain::synthesis::{JobMode, SynthesisJob};

/// SynthesisCoordinator
pub struct SynthesisCoordinator {
    normalizer: RequestNormalizer,
    gate: Arc<dyn AdmissionGatePort>,
    store: Arc<dyn AssetStorePort>,
    engine: Arc<dyn SynthesisEnginePort>,
}

impl SynthesisCoordinator {
    pub fn new(
        normalizer: RequestNormalizer,
        gate: Arc<dyn AdmissionGatePort>,
        store: Arc<dyn AssetStorePort>,
        engine: Arc<dyn SynthesisEnginePort>,
    ) -> Self {
        Self {
            normalizer,
            gate,
            store,
            engine,
        }
    }

    /// 当前是否有任务在执行
    pub fn is_busy(&self) -> bool {
        self.gate.is_held()
    }

    /// 处理一次合成请求
    ///
    /// 校验失败时不触碰准入门、存储和引擎
    pub async fn handle(&self, cmd: SynthesizeCommand) -> Result<SynthesisOutput, ApplicationError> {
        let job = self.normalizer.normalize(cmd)?;
        self.execute(job).await
    }

    /// 执行已规范化的任务
    ///
    /// 准入后任务在独立 task 中运行并持有 GateToken：
    /// 客户端断开不会中断引擎调用，引擎返回后才释放准入门
    pub async fn execute(&self, job: SynthesisJob) -> Result<SynthesisOutput, ApplicationError> {
        let job_id = job.job_id;
        let mode = job.mode.as_str();

        let token = self.gate.try_acquire().map_err(|busy| {
            tracing::info!(job_id = %job_id, mode = mode, "Rejected: engine busy");
            ApplicationError::from(busy)
        })?;

        tracing::info!(
            job_id = %job_id,
            mode = mode,
            text_len = job.text.len(),
            "Synthesis job admitted"
        );

        let store = self.store.clone();
        let engine = self.engine.clone();
        let task = tokio::spawn(async move {
            let _token = token; // 持有 token 直到任务结束
            Self::run_admitted(store, engine, job).await
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Synthesis task aborted");
                Err(ApplicationError::internal(format!(
                    "Synthesis task aborted: {}",
                    e
                )))
            }
        }
    }

    async fn run_admitted(
        store: Arc<dyn AssetStorePort>,
        engine: Arc<dyn SynthesisEnginePort>,
        job: SynthesisJob,
    ) -> Result<SynthesisOutput, ApplicationError> {
        let started = Instant::now();

        let prompt = store.put(job.speaker_prompt.data()).await?;
        let emotion_audio_path = match &job.mode {
            JobMode::ReferenceAudio { emotion_audio, .. } => {
                Some(store.put(emotion_audio.data()).await?.path)
            }
            _ => None,
        };

        tracing::debug!(
            job_id = %job.job_id,
            prompt = %prompt.path.display(),
            prompt_bytes = prompt.size_bytes,
            "Audio inputs resolved"
        );

        let request = build_engine_request(&job, prompt.path, emotion_audio_path);
        let output = engine.synthesize(request).await.map_err(|e| {
            tracing::error!(job_id = %job.job_id, error = %e, "Engine failed");
            ApplicationError::from(e)
        })?;

        if output.audio_data.is_empty() {
            return Err(ApplicationError::EngineError(
                "Engine returned empty audio".to_string(),
            ));
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            job_id = %job.job_id,
            audio_size = output.audio_data.len(),
            elapsed_ms = elapsed_ms,
            "Synthesis job completed"
        );

        Ok(SynthesisOutput {
            job_id: job.job_id,
            audio_data: output.audio_data,
            elapsed_ms,
        })
    }
}

/// 将规范化任务映射为引擎调用参数
pub fn build_engine_request(
    job: &SynthesisJob,
    speaker_prompt_path: PathBuf,
    emotion_audio_path: Option<PathBuf>,
) -> EngineRequest {
    let mut request = EngineRequest {
        spk_audio_prompt: speaker_prompt_path,
        text: job.text.clone(),
        emo_audio_prompt: None,
        emo_alpha: 1.0,
        emo_vector: None,
        use_emo_text: false,
        emo_text: None,
        use_random: false,
        max_text_tokens_per_segment: job.max_text_tokens_per_segment,
        generation: job.generation,
    };

    match &job.mode {
        JobMode::Speaker => {}
        JobMode::ReferenceAudio { emo_alpha, .. } => {
            request.emo_audio_prompt = emotion_audio_path;
            request.emo_alpha = *emo_alpha;
        }
        JobMode::EmotionVector { vector, use_random } => {
            request.emo_vector = Some(vector.to_vec());
            request.use_random = *use_random;
        }
        JobMode::EmotionText {
            emotion_text,
            use_random,
        } => {
            request.use_emo_text = true;
            request.emo_text = emotion_text.clone();
            request.use_random = *use_random;
        }
    }

    request
}
