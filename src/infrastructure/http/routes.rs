//! HTTP Routes
//!
//! API Endpoints:
//! - /synthesize/speaker    POST  仅音色克隆
//! - /synthesize/reference  POST  参考音频情感
//! - /synthesize/vector     POST  情感向量
//! - /synthesize/text       POST  文本情感描述
//! - /ping                  GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/synthesize", synthesize_routes())
}

/// Synthesize 路由
fn synthesize_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/speaker", post(handlers::synthesize_speaker))
        .route("/reference", post(handlers::synthesize_reference))
        .route("/vector", post(handlers::synthesize_vector))
        .route("/text", post(handlers::synthesize_text))
}
