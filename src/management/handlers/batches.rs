//! # 批次处理器

use axum::extract::State;
use axum::response::Response;

use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::BatchesService;

pub async fn list_batches(State(state): State<AppState>) -> Response {
    match BatchesService::new(state.db()).list().await {
        Ok(batches) => response::success(batches),
        Err(err) => response::app_error(err),
    }
}
