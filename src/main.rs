//! SpeechGate - IndexTTS 合成服务
//!
//! 准入门 → 规范化 → 提示音频缓存 → 推理引擎

use std::sync::Arc;

use speechgate::application::{
    NormalizerConfig, RequestNormalizer, SynthesisEnginePort,
};
use speechgate::config::{load_config, print_config, AppConfig, EngineKind};
use speechgate::infrastructure::adapters::{
    FakeEngineConfig, FakeSynthesisEngine, FileContentStore, HttpEngineConfig,
    HttpSynthesisEngine,
};
use speechgate::infrastructure::http::{AppState, HttpServer, ServerConfig};
use speechgate::infrastructure::memory::SemaphoreAdmissionGate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("SpeechGate - IndexTTS 合成服务 v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let engine = build_engine(&config)?;
    if !engine.health_check().await {
        tracing::warn!("Synthesis engine is not reachable yet, requests will fail until it is up");
    }

    // 缓存目录在首次写入时创建
    let store = Arc::new(FileContentStore::new(
        &config.storage.cache_dir,
        config.storage.extension.clone(),
    ));
    let gate = Arc::new(SemaphoreAdmissionGate::new());
    let normalizer = RequestNormalizer::new(NormalizerConfig {
        emotion_weight_scale: config.synthesis.emotion_weight_scale,
        default_max_text_tokens: config.synthesis.default_max_text_tokens,
    });

    let state = AppState::new(normalizer, gate, store, engine);
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    let server = HttpServer::new(server_config, state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置中的级别
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},speechgate={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn SynthesisEnginePort>> {
    let engine: Arc<dyn SynthesisEnginePort> = match config.engine.kind {
        EngineKind::Http => {
            let engine_config = HttpEngineConfig::new(&config.engine.url)
                .with_timeout(config.engine.timeout_secs);
            Arc::new(HttpSynthesisEngine::new(engine_config)?)
        }
        EngineKind::Fake => Arc::new(FakeSynthesisEngine::new(FakeEngineConfig {
            audio_file_path: config.engine.fake_audio_path.clone(),
            delay_ms: config.engine.fake_delay_ms,
            fail: false,
        })?),
    };
    Ok(engine)
}
