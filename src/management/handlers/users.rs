//! # 用户处理器

use axum::extract::State;
use axum::response::Response;

use crate::management::extract::ApiPath;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::UsersService;

/// 列出用户
pub async fn list_users(State(state): State<AppState>) -> Response {
    match UsersService::new(state.db()).list().await {
        Ok(users) => response::success(users),
        Err(err) => response::app_error(err),
    }
}

/// 获取单个用户
pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Response {
    match UsersService::new(state.db()).get(id).await {
        Ok(user) => response::success(user),
        Err(err) => response::app_error(err),
    }
}
