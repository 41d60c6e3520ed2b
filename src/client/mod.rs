//! Synthesis Client - SpeechGate HTTP 客户端
//!
//! 四种合成请求的 typed 封装；服务端返回 429/BUSY 时按指数退避重试，
//! 其他错误立即返回

use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::domain::synthesis::{encode_base64, AudioPayload, GenerationParams};
use crate::infrastructure::http::ErrorResponse;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server still busy after {attempts} attempts")]
    Busy { attempts: u32 },

    #[error("Request failed with {status}: [{code}] {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// BUSY 重试策略：第 n 次重试前等待 `unit * base^n`
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: f64,
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_base: 1.5,
            unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// 不重试
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// 第 `attempt` 次重试（从 1 开始）前的等待时间
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.unit.mul_f64(self.backoff_base.powi(attempt as i32))
    }
}

/// 四种请求共享的字段
#[derive(Debug, Clone, Serialize)]
pub struct RequestBase {
    pub prompt_audio: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_text_tokens_per_segment: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_args: Option<GenerationParams>,
}

impl RequestBase {
    pub fn new(prompt_audio: &[u8], text: impl Into<String>) -> Self {
        Self {
            prompt_audio: encode_base64(prompt_audio),
            text: text.into(),
            max_text_tokens_per_segment: None,
            generation_args: None,
        }
    }

    pub fn with_max_text_tokens(mut self, tokens: u32) -> Self {
        self.max_text_tokens_per_segment = Some(tokens);
        self
    }

    pub fn with_generation(mut self, params: GenerationParams) -> Self {
        self.generation_args = Some(params);
        self
    }
}

/// 参考音频情感请求
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    pub emotion_audio: String,
    pub emotion_weight: f64,
}

impl ReferenceRequest {
    pub fn new(base: RequestBase, emotion_audio: &[u8], emotion_weight: f64) -> Self {
        Self {
            base,
            emotion_audio: encode_base64(emotion_audio),
            emotion_weight,
        }
    }
}

/// 情感向量请求
#[derive(Debug, Clone, Serialize)]
pub struct VectorRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    pub emotion_factors: BTreeMap<String, f64>,
    pub emotion_random: bool,
}

/// 文本情感请求；emotion_text 为 None 时仍发送 `null`
#[derive(Debug, Clone, Serialize)]
pub struct TextRequest {
    #[serde(flatten)]
    pub base: RequestBase,
    pub emotion_text: Option<String>,
    pub emotion_random: bool,
}

/// SpeechGate 客户端
pub struct SynthesisClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl SynthesisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| ClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn speaker(&self, request: &RequestBase) -> Result<Vec<u8>, ClientError> {
        self.post("/synthesize/speaker", request).await
    }

    pub async fn reference(&self, request: &ReferenceRequest) -> Result<Vec<u8>, ClientError> {
        self.post("/synthesize/reference", request).await
    }

    pub async fn vector(&self, request: &VectorRequest) -> Result<Vec<u8>, ClientError> {
        self.post("/synthesize/vector", request).await
    }

    pub async fn text(&self, request: &TextRequest) -> Result<Vec<u8>, ClientError> {
        self.post("/synthesize/text", request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Vec<u8>, ClientError> {
        let url = self.url(path);
        let mut attempt = 0u32;

        loop {
            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| ClientError::NetworkError(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                attempt += 1;
                if attempt > self.retry.max_retries {
                    return Err(ClientError::Busy { attempts: attempt });
                }
                let delay = self.retry.delay_for(attempt);
                tracing::info!(url = %url, attempt, delay_ms = delay.as_millis() as u64, "Server busy, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(match serde_json::from_str::<ErrorResponse>(&text) {
                    Ok(err) => ClientError::Api {
                        status: status.as_u16(),
                        code: err.code,
                        message: err.message,
                    },
                    Err(_) => ClientError::Api {
                        status: status.as_u16(),
                        code: String::new(),
                        message: text,
                    },
                });
            }

            let encoded: String = response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            return AudioPayload::decode_base64(&encoded)
                .map_err(|e| ClientError::InvalidResponse(e.0));
        }
    }
}
