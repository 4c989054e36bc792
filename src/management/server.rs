//! # HTTP 服务器
//!
//! Axum 路由组装与监听

use crate::app::context::AppContext;
use crate::config::ServerConfig;
use crate::error::{QmsError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::management::handlers::system;
use crate::management::middleware::request_id_middleware;
use crate::{linfo, lwarn};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    #[must_use]
    pub const fn context_arc(&self) -> &Arc<AppContext> {
        &self.context
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// HTTP 服务器
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    #[must_use]
    pub fn new(config: ServerConfig, context: Arc<AppContext>) -> Self {
        let router = create_router(AppState::new(context), &config);
        Self { config, router }
    }

    /// 启动服务器，直到收到 Ctrl+C
    pub async fn serve(self) -> Result<()> {
        let bind_address = self.config.bind_address();
        let addr: SocketAddr = bind_address.parse().map_err(|e| {
            QmsError::config_with_source(format!("监听地址无效: {bind_address}"), e)
        })?;

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            QmsError::server_start_with_source(format!("端口绑定失败: {addr}"), e)
        })?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("QMS API 服务器已启动: http://{addr}")
        );

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| QmsError::server_start_with_source("服务器运行失败", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stop",
            "QMS API 服务器已停止"
        );
        Ok(())
    }
}

/// 创建路由器：`/api` 资源路由、`/ping`、`/` 服务描述，以及中间件
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let api_routes = super::routes::create_routes(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/ping", get(system::ping_handler))
        .route("/", get(system::root_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .layer(DefaultBodyLimit::max(config.max_request_size))
        .layer(axum::middleware::from_fn(request_id_middleware))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static(crate::management::extract::USER_ID_HEADER),
        ]);

    if config.allows_any_origin() {
        return cors_layer.allow_origin(Any);
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>();

    match origins {
        Ok(origins) => cors_layer.allow_origin(origins),
        Err(e) => {
            lwarn!(
                "system",
                LogStage::Startup,
                LogComponent::ServerSetup,
                "cors_config_fail",
                &format!("CORS 源配置无效，改为允许任意来源: {e}")
            );
            cors_layer.allow_origin(Any)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lwarn!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "signal_fail",
            &format!("监听退出信号失败: {e}")
        );
    }
}
