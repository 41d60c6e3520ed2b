//! Command Handlers 实现
//!
//! 请求规范化与合成编排

mod request_normalizer;
mod synthesis_coordinator;

pub use request_normalizer::*;
pub use synthesis_coordinator::*;
