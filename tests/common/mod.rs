//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

use speechgate::application::{
    EngineError, EngineOutput, EngineRequest, RequestNormalizer, SynthesisEnginePort,
};
use speechgate::domain::synthesis::encode_base64;
use speechgate::infrastructure::adapters::{FakeEngineConfig, FakeSynthesisEngine, FileContentStore};
use speechgate::infrastructure::http::{build_router, AppState};
use speechgate::infrastructure::memory::SemaphoreAdmissionGate;

pub const PROMPT_AUDIO: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt speaker prompt";
pub const EMOTION_AUDIO: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt emo_hate";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub cache_dir: PathBuf,
    _tmp: TempDir,
}

impl TestApp {
    pub fn with_engine(engine: Arc<dyn SynthesisEnginePort>) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        // 缓存目录由首次写入创建
        let cache_dir = tmp.path().join("prompts");
        let store = Arc::new(FileContentStore::new(&cache_dir, "wav"));
        let gate = Arc::new(SemaphoreAdmissionGate::new());
        let state = Arc::new(AppState::new(
            RequestNormalizer::default(),
            gate,
            store,
            engine,
        ));
        let router = build_router(state.clone(), 64 * 1024 * 1024);

        Self {
            router,
            state,
            cache_dir,
            _tmp: tmp,
        }
    }

    pub fn fake(config: FakeEngineConfig) -> Self {
        Self::with_engine(Arc::new(FakeSynthesisEngine::new(config).unwrap()))
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(path, body.to_string()).await
    }

    pub async fn post_raw(&self, path: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// 已发布的缓存文件（忽略临时文件）
    pub fn cached_files(&self) -> Vec<PathBuf> {
        published_files(&self.cache_dir)
    }

    /// 等待某个请求持有准入门
    pub async fn wait_until_busy(&self) {
        for _ in 0..400 {
            if self.state.coordinator.is_busy() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("gate never became busy");
    }
}

pub fn published_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            !FileContentStore::is_temp_file(&name)
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

pub fn sha256_hex(data: &[u8]) -> String {
    speechgate::domain::synthesis::ContentHash::of(data)
        .as_str()
        .to_string()
}

pub fn speaker_body(text: &str) -> Value {
    json!({
        "prompt_audio": encode_base64(PROMPT_AUDIO),
        "text": text,
        "max_text_tokens_per_segment": 120,
    })
}

pub fn emotion_factors(surprised: f64) -> Value {
    json!({
        "happy": 0.0, "angry": 0.0, "sad": 0.0, "afraid": 0.0,
        "disgusted": 0.0, "melancholic": 0.0, "surprised": surprised, "calm": 0.0
    })
}

pub fn vector_body(surprised: f64) -> Value {
    json!({
        "prompt_audio": encode_base64(PROMPT_AUDIO),
        "text": "哇塞！这个爆率也太高了！",
        "emotion_factors": emotion_factors(surprised),
        "emotion_random": false,
    })
}

/// 记录引擎请求的测试引擎
#[derive(Default)]
pub struct RecordingEngine {
    pub requests: Mutex<Vec<EngineRequest>>,
}

impl RecordingEngine {
    pub fn last(&self) -> EngineRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl SynthesisEnginePort for RecordingEngine {
    async fn synthesize(&self, request: EngineRequest) -> Result<EngineOutput, EngineError> {
        self.requests.lock().unwrap().push(request);
        Ok(EngineOutput {
            audio_data: b"synthesized".to_vec(),
        })
    }
}
