//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（AdmissionGate、AssetStore、SynthesisEngine）
//! - commands: 合成命令、请求规范化与编排
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{
        build_engine_request, NormalizerConfig, RequestNormalizer, SynthesisCoordinator,
        DEFAULT_EMOTION_WEIGHT, DEFAULT_EMOTION_WEIGHT_SCALE,
    },
    SynthesisBase, SynthesisOutput, SynthesizeCommand, SynthesizeReference, SynthesizeSpeaker,
    SynthesizeText, SynthesizeVector,
};

pub use error::ApplicationError;

pub use ports::{
    // Admission gate
    AdmissionGatePort,
    GateBusy,
    GateToken,
    // Asset store
    AssetStorePort,
    CachedAsset,
    StoreError,
    // Synthesis engine
    EngineError,
    EngineOutput,
    EngineRequest,
    SynthesisEnginePort,
};
