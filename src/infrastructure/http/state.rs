//! Application State
//!
//! 所有请求共享的 SynthesisCoordinator

use std::sync::Arc;

use crate::application::{
    AdmissionGatePort, AssetStorePort, RequestNormalizer, SynthesisCoordinator,
    SynthesisEnginePort,
};

/// 应用状态
pub struct AppState {
    pub coordinator: SynthesisCoordinator,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        normalizer: RequestNormalizer,
        gate: Arc<dyn AdmissionGatePort>,
        store: Arc<dyn AssetStorePort>,
        engine: Arc<dyn SynthesisEnginePort>,
    ) -> Self {
        Self {
            coordinator: SynthesisCoordinator::new(normalizer, gate, store, engine),
        }
    }
}
