use crate::error::ApiError;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use vigil_allowlist::AllowlistStore;
use vigil_sweep::SweepRunner;
use vigil_types::SweepResult;

/// 应用状态
///
/// 扫描和白名单变更端点共用同一个 store 实例，
/// 白名单路径只在装配时配置一次。
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<SweepRunner>,
    pub store: Arc<AllowlistStore>,
}

/// 白名单变更请求
#[derive(Debug, Deserialize)]
pub struct ModelRequest {
    pub model: Option<String>,
}

/// 白名单变更响应
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub status: String,
    pub message: String,
}

/// 存活检查
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// 手动触发一次扫描，扫描失败也通过 200 响应体表达
pub async fn run_monitor(State(state): State<AppState>) -> Json<SweepResult> {
    Json(state.runner.run().await)
}

/// 追加白名单模型
pub async fn add_model(
    State(state): State<AppState>,
    Json(req): Json<ModelRequest>,
) -> Result<Json<ModelResponse>, ApiError> {
    let model = require_model(req)?;
    state.store.add(&model).await?;

    Ok(Json(ModelResponse {
        status: "success".to_string(),
        message: format!("Model '{}' added", model),
    }))
}

/// 删除白名单模型
pub async fn remove_model(
    State(state): State<AppState>,
    Json(req): Json<ModelRequest>,
) -> Result<Json<ModelResponse>, ApiError> {
    let model = require_model(req)?;
    state.store.remove(&model).await?;

    Ok(Json(ModelResponse {
        status: "success".to_string(),
        message: format!("Model '{}' removed", model),
    }))
}

fn require_model(req: ModelRequest) -> Result<String, ApiError> {
    req.model
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No model provided".to_string()))
}
