//! # 集成测试公共设施
//!
//! 内存 SQLite + 完整迁移 + 完整路由，请求通过 `oneshot` 直接发给路由器。

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::response::Response;
use axum::http::{Method, Request, StatusCode, header};
use qms_api::app::AppContext;
use qms_api::config::{AppConfig, DatabaseConfig};
use qms_api::database::{init_database, run_migrations};
use qms_api::management::{AppState, create_router};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

/// 测试用应用
pub struct TestApp {
    pub router: Router,
    pub db: Arc<DatabaseConnection>,
}

impl TestApp {
    /// 新建一个带迁移的内存数据库应用实例
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// 使用自定义配置启动，数据库仍为内存 SQLite
    pub async fn spawn_with(config: AppConfig) -> Self {
        let db = init_database(&config.database).await.unwrap();
        run_migrations(&db).await.unwrap();
        let db = Arc::new(db);

        let context = Arc::new(AppContext::new(Arc::new(config.clone()), Arc::clone(&db)));
        let router = create_router(AppState::new(context), &config.server);

        Self { router, db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 发送原始请求体，返回完整响应
    pub async fn send_raw(&self, method: Method, uri: &str, body: Body) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// 发送请求，返回状态码和 JSON 响应体（非 JSON 时为字符串）
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user_id: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header("X-User-Id", user_id);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, None).await
    }

    /// 创建一条偏差，返回新记录ID
    pub async fn create_deviation(&self, severity: i32, occurrence: i32, detection: i32) -> i32 {
        let (status, body) = self
            .post(
                "/api/deviations",
                serde_json::json!({
                    "title": "Temperature excursion",
                    "description": "Cold room above upper limit",
                    "category": "Equipment",
                    "severity": severity,
                    "occurrence": occurrence,
                    "detection": detection,
                    "detected_date": "2024-05-02"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        i32::try_from(body["id"].as_i64().unwrap()).unwrap()
    }
}

/// 测试默认配置：内存数据库
pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// 读取响应体为 JSON（非 JSON 时为字符串）
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

/// 直接插入一个用户，返回ID
pub async fn insert_user(db: &DatabaseConnection, username: &str, full_name: &str) -> i32 {
    use entity::users;
    use sea_orm::{ActiveModelTrait, Set};

    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@pharma.test")),
        full_name: Set(full_name.to_string()),
        role: Set("QC Analyst".to_string()),
        department: Set(Some("Quality Control".to_string())),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}
