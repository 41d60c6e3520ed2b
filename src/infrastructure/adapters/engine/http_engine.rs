//! HTTP Synthesis Engine - 调用引擎推理进程
//!
//! 实现 SynthesisEnginePort trait，通过 HTTP 调用与本服务同机部署的引擎进程
//!
//! 引擎 API:
//! POST http://127.0.0.1:9020/infer
//! Request: EngineRequest (JSON)，音频以本地路径传递
//! Response: audio/wav binary

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{EngineError, EngineOutput, EngineRequest, SynthesisEnginePort};

/// HTTP 引擎客户端配置
#[derive(Debug, Clone)]
pub struct HttpEngineConfig {
    /// 引擎服务基础 URL
    pub base_url: String,
    /// 单次合成超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpEngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9020".to_string(),
            timeout_secs: 600,
        }
    }
}

impl HttpEngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 合成引擎
pub struct HttpSynthesisEngine {
    client: Client,
    config: HttpEngineConfig,
}

impl HttpSynthesisEngine {
    pub fn new(config: HttpEngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn infer_url(&self) -> String {
        format!("{}/infer", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SynthesisEnginePort for HttpSynthesisEngine {
    async fn synthesize(&self, request: EngineRequest) -> Result<EngineOutput, EngineError> {
        tracing::debug!(
            url = %self.infer_url(),
            text_len = request.text.len(),
            prompt = %request.spk_audio_prompt.display(),
            "Sending engine infer request"
        );

        let response = self
            .client
            .post(self.infer_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout
                } else if e.is_connect() {
                    EngineError::NetworkError(format!("Cannot connect to engine: {}", e))
                } else {
                    EngineError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::Failure(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::debug!(audio_size = audio_data.len(), "Engine inference completed");

        Ok(EngineOutput { audio_data })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::GenerationParams;
    use axum::{body::Bytes, http::StatusCode, routing::post, Json, Router};
    use std::path::PathBuf;

    fn request() -> EngineRequest {
        EngineRequest {
            spk_audio_prompt: PathBuf::from("/cache/abc.wav"),
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

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_config_builder() {
        let config = HttpEngineConfig::new("http://example.com:9000/").with_timeout(60);
        assert_eq!(config.timeout_secs, 60);
        let engine = HttpSynthesisEngine::new(config).unwrap();
        assert_eq!(engine.infer_url(), "http://example.com:9000/infer");
    }

    #[test]
    fn test_request_wire_shape() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(value["spk_audio_prompt"], "/cache/abc.wav");
        assert_eq!(value["emo_alpha"], 1.0);
        // 生成参数平铺在顶层
        assert_eq!(value["top_k"], 30);
        assert_eq!(value["max_mel_tokens"], 1500);
        assert!(value["emo_vector"].is_null());
    }

    #[tokio::test]
    async fn test_synthesize_returns_body_bytes() {
        let router = Router::new().route(
            "/infer",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["text"], "hello");
                Bytes::from_static(b"RIFFaudio")
            }),
        );
        let base_url = serve(router).await;
        let engine = HttpSynthesisEngine::new(HttpEngineConfig::new(base_url)).unwrap();

        let output = engine.synthesize(request()).await.unwrap();
        assert_eq!(output.audio_data, b"RIFFaudio");
    }

    #[tokio::test]
    async fn test_synthesize_maps_http_error() {
        let router = Router::new().route(
            "/infer",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let base_url = serve(router).await;
        let engine = HttpSynthesisEngine::new(HttpEngineConfig::new(base_url)).unwrap();

        let err = engine.synthesize(request()).await.unwrap_err();
        assert!(matches!(err, EngineError::Failure(ref msg) if msg.contains("model crashed")));
        assert!(!engine.health_check().await);
    }
}
