//! # 系统信息处理器

use axum::response::Response;
use serde::Serialize;

use crate::management::response;

/// 服务名
pub const SERVICE_NAME: &str = "Pharmaceutical QMS API Server";

#[derive(Debug, Serialize)]
struct Endpoints {
    users: &'static str,
    deviations: &'static str,
    capa: &'static str,
    monitoring: &'static str,
    dashboard: &'static str,
    reports: &'static str,
    batches: &'static str,
}

#[derive(Debug, Serialize)]
struct ServiceDescriptor {
    message: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

/// 根路径：服务描述与资源入口
pub async fn root_handler() -> Response {
    response::success(ServiceDescriptor {
        message: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            users: "/api/users",
            deviations: "/api/deviations",
            capa: "/api/capa",
            monitoring: "/api/monitoring",
            dashboard: "/api/dashboard",
            reports: "/api/reports",
            batches: "/api/batches",
        },
    })
}

/// 存活检查
pub async fn ping_handler() -> &'static str {
    "pong"
}
