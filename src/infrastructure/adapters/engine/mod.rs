//! Engine Adapter - 合成引擎实现

mod fake_engine;
mod http_engine;

pub use fake_engine::{silent_wav, FakeEngineConfig, FakeSynthesisEngine};
pub use http_engine::{HttpEngineConfig, HttpSynthesisEngine};
