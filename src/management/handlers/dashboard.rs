//! # 仪表盘处理器

use axum::extract::State;
use axum::response::Response;

use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::DashboardService;

pub async fn kpis(State(state): State<AppState>) -> Response {
    match DashboardService::new(state.db()).kpis().await {
        Ok(kpis) => response::success(kpis),
        Err(err) => response::app_error(err),
    }
}

pub async fn trends(State(state): State<AppState>) -> Response {
    match DashboardService::new(state.db()).trends().await {
        Ok(trends) => response::success(trends),
        Err(err) => response::app_error(err),
    }
}

pub async fn recent_activity(State(state): State<AppState>) -> Response {
    match DashboardService::new(state.db()).recent_activity().await {
        Ok(activity) => response::success(activity),
        Err(err) => response::app_error(err),
    }
}
