//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod admission_gate;
mod asset_store;
mod synthesis_engine;

pub use admission_gate::{AdmissionGatePort, GateBusy, GateToken};
pub use asset_store::{AssetStorePort, CachedAsset, StoreError};
pub use synthesis_engine::{EngineError, EngineOutput, EngineRequest, SynthesisEnginePort};
