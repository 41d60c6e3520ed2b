//! Synthesize Handlers
//!
//! 四种请求形态各一个端点，成功时返回 base64 音频字符串

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    SynthesizeCommand, SynthesizeReference, SynthesizeSpeaker, SynthesizeText, SynthesizeVector,
};
use crate::domain::synthesis::encode_base64;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

/// 仅音色克隆
pub async fn synthesize_speaker(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SynthesizeSpeaker>,
) -> Result<Json<String>, ApiError> {
    run(&state, SynthesizeCommand::Speaker(req)).await
}

/// 参考音频情感
pub async fn synthesize_reference(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SynthesizeReference>,
) -> Result<Json<String>, ApiError> {
    run(&state, SynthesizeCommand::Reference(req)).await
}

/// 情感向量
pub async fn synthesize_vector(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SynthesizeVector>,
) -> Result<Json<String>, ApiError> {
    run(&state, SynthesizeCommand::Vector(req)).await
}

/// 文本情感描述
pub async fn synthesize_text(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SynthesizeText>,
) -> Result<Json<String>, ApiError> {
    run(&state, SynthesizeCommand::Text(req)).await
}

async fn run(state: &AppState, cmd: SynthesizeCommand) -> Result<Json<String>, ApiError> {
    let output = state.coordinator.handle(cmd).await?;
    Ok(Json(encode_base64(&output.audio_data)))
}
