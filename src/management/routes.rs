//! # 路由配置
//!
//! 所有资源路由，由服务器挂载在 `/api` 下。

use crate::management::handlers::{
    batches, capa, dashboard, deviations, monitoring, reports, users,
};
use crate::management::server::AppState;
use axum::Router;
use axum::routing::{get, post};

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/users", user_routes())
        .nest("/deviations", deviation_routes())
        .nest("/capa", capa_routes())
        .nest("/monitoring", monitoring_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/reports", report_routes())
        .nest("/batches", batch_routes())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/{id}", get(users::get_user))
}

/// 偏差路由；静态路径 `/stats` 优先于 `/{id}`
fn deviation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(deviations::list_deviations).post(deviations::create_deviation),
        )
        .route("/stats", get(deviations::deviation_stats))
        .route(
            "/{id}",
            get(deviations::get_deviation)
                .put(deviations::update_deviation)
                .delete(deviations::delete_deviation),
        )
}

fn capa_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(capa::list_capa).post(capa::create_capa))
        .route("/stats", get(capa::capa_stats))
        .route("/by-deviation/{deviation_id}", get(capa::capa_by_deviation))
        .route("/{id}", get(capa::get_capa).put(capa::update_capa))
}

fn monitoring_routes() -> Router<AppState> {
    Router::new()
        .route("/environmental", get(monitoring::list_environmental))
        .route("/process", get(monitoring::list_process))
        .route("/record", post(monitoring::record_reading))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/kpis", get(dashboard::kpis))
        .route("/trends", get(dashboard::trends))
        .route("/recent-activity", get(dashboard::recent_activity))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports))
        .route("/generate", post(reports::generate_report))
}

fn batch_routes() -> Router<AppState> {
    Router::new().route("/", get(batches::list_batches))
}
