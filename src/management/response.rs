//! # API 响应结构
//!
//! 成功时直接输出 JSON 数据体；失败时统一为 `{"error": "<message>"}`。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{ErrorCategory, QmsError};
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, lwarn};

/// # 标准错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 失败请求的日志信息
///
/// 随响应扩展传出，由请求ID中间件带上请求ID后输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLog {
    pub category: ErrorCategory,
    pub code: &'static str,
    pub detail: String,
}

impl FailureLog {
    fn from_error(error: &QmsError) -> Self {
        let category = error.category();
        let detail = match category {
            ErrorCategory::Server => format!("{error:?}"),
            ErrorCategory::Client => error.to_string(),
        };
        Self {
            category,
            code: error.to_http_response_parts().1,
            detail,
        }
    }

    /// 以请求ID输出：5xx 记 error，4xx 记 warn
    pub fn emit(&self, request_id: &str) {
        match self.category {
            ErrorCategory::Server => lerror!(
                request_id,
                LogStage::Error,
                LogComponent::ServerSetup,
                "request_failed",
                &self.detail,
                code = self.code
            ),
            ErrorCategory::Client => lwarn!(
                request_id,
                LogStage::Response,
                LogComponent::ServerSetup,
                "request_rejected",
                &self.detail,
                code = self.code
            ),
        }
    }
}

/// # API响应枚举
///
/// 统一所有API出口，方便转换为 `axum::response::Response`
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Ok(T),
    Created(T),
    Error(StatusCode, String),
    AppError(QmsError),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(data) => (StatusCode::OK, Json(data)).into_response(),
            Self::Created(data) => (StatusCode::CREATED, Json(data)).into_response(),
            Self::Error(status, message) => {
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            Self::AppError(error) => {
                let (status, _) = error.to_http_response_parts();
                let mut response = (
                    status,
                    Json(ErrorResponse {
                        error: error.client_message(),
                    }),
                )
                    .into_response();
                response
                    .extensions_mut()
                    .insert(FailureLog::from_error(&error));
                response
            }
        }
    }
}

/// # 便捷函数：200 成功响应
pub fn success<T: Serialize>(data: T) -> Response {
    ApiResponse::Ok(data).into_response()
}

/// # 便捷函数：201 创建成功响应
pub fn created<T: Serialize>(data: T) -> Response {
    ApiResponse::Created(data).into_response()
}

/// # 便捷函数：HTTP错误响应
pub fn error(status: StatusCode, message: &str) -> Response {
    ApiResponse::<()>::Error(status, message.to_string()).into_response()
}

/// # 便捷函数：应用错误响应
pub fn app_error(error: QmsError) -> Response {
    ApiResponse::<()>::AppError(error).into_response()
}

impl IntoResponse for QmsError {
    fn into_response(self) -> Response {
        app_error(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = app_error(QmsError::not_found("Deviation", 9999));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Deviation not found"}));
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let response = app_error(QmsError::database("disk I/O error"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Internal server error"})
        );
    }

    #[test]
    fn test_failure_log_travels_with_response() {
        let response = app_error(QmsError::not_found("CAPA", 12));
        let failure = response.extensions().get::<FailureLog>().unwrap();
        assert_eq!(failure.category, ErrorCategory::Client);
        assert_eq!(failure.code, "RESOURCE_NOT_FOUND");
        assert_eq!(failure.detail, "资源未找到: CAPA 12");

        let response = app_error(QmsError::database("disk I/O error"));
        let failure = response.extensions().get::<FailureLog>().unwrap();
        assert_eq!(failure.category, ErrorCategory::Server);
        assert!(failure.detail.contains("disk I/O error"));
    }

    #[tokio::test]
    async fn test_created_status() {
        let response = created(json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], 1);
    }
}
