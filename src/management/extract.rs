//! # 请求提取器
//!
//! - [`ApiJson`]：JSON 请求体，解析失败返回 400 `{"error": ...}`
//! - [`ApiPath`]：路径参数，解析失败同样返回 JSON 错误体
//! - [`Actor`]：本次请求的操作人与客户端地址

use axum::{
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode, request::Parts},
    response::Response,
};
use serde::de::DeserializeOwned;
use std::net::IpAddr;

use super::middleware::RequestId;
use super::response;
use super::server::AppState;

/// 指定操作人的请求头
pub const USER_ID_HEADER: &str = "x-user-id";

/// JSON 请求体提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                // 超过请求体上限保留 413
                let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    StatusCode::PAYLOAD_TOO_LARGE
                } else {
                    StatusCode::BAD_REQUEST
                };
                Err(response::error(status, &json_rejection_message(&rejection)))
            }
        }
    }
}

/// 路径参数提取器
///
/// 非数字的ID返回 400；数字但超出 `i32` 范围的ID不可能存在，返回 404。
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection_response(&rejection)),
        }
    }
}

fn path_rejection_response(rejection: &PathRejection) -> Response {
    if let PathRejection::FailedToDeserializePathParams(err) = rejection {
        if let ErrorKind::ParseErrorAtKey { value, .. }
        | ErrorKind::ParseErrorAtIndex { value, .. }
        | ErrorKind::ParseError { value, .. } = err.kind()
        {
            if is_integer_literal(value) {
                return response::error(StatusCode::NOT_FOUND, "Resource not found");
            }
        }
    }

    response::error(
        StatusCode::BAD_REQUEST,
        &format!("Invalid path parameter: {}", rejection.body_text()),
    )
}

/// 整数字面量（可带负号）；解析失败时只可能是溢出
fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn json_rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be JSON (Content-Type: application/json)".to_string()
        }
        other => format!("Invalid request body: {}", other.body_text()),
    }
}

/// 操作人
///
/// 用户ID 取自 `X-User-Id`，缺省为配置中的默认操作人；
/// 客户端地址取自 `X-Forwarded-For` / `X-Real-IP`，写入审计日志。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub ip_address: Option<String>,
}

impl Actor {
    #[must_use]
    pub const fn new(user_id: i32) -> Self {
        Self {
            user_id,
            ip_address: None,
        }
    }

    /// 请求体显式指定的归属人优先
    #[must_use]
    pub fn attribute(&self, explicit: Option<i32>) -> i32 {
        explicit.unwrap_or(self.user_id)
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = match parts.headers.get(USER_ID_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| raw.trim().parse::<i32>().ok())
                .filter(|id| *id > 0)
                .ok_or_else(|| {
                    response::error(
                        StatusCode::BAD_REQUEST,
                        "X-User-Id header must be a positive integer",
                    )
                })?,
            None => state.default_actor_id(),
        };

        Ok(Self {
            user_id,
            ip_address: client_ip(&parts.headers).map(|ip| ip.to_string()),
        })
    }
}

/// 请求ID，未经过中间件时现场生成
impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_default())
    }
}

/// 获取真实客户端IP地址（考虑代理情况）
fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // X-Forwarded-For 可能包含多个IP，取第一个
    if let Some(first_ip) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
    {
        if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
            return Some(ip);
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.1.2.3, 192.168.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("172.16.0.9"));
        assert_eq!(client_ip(&headers), Some("10.1.2.3".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        headers.insert("x-real-ip", HeaderValue::from_static("172.16.0.9"));
        assert_eq!(client_ip(&headers), Some("172.16.0.9".parse().unwrap()));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_integer_literal() {
        assert!(is_integer_literal("99999999999"));
        assert!(is_integer_literal("-4"));
        assert!(!is_integer_literal("abc"));
        assert!(!is_integer_literal("-"));
        assert!(!is_integer_literal("12a"));
    }

    #[test]
    fn test_payload_attribution_wins() {
        let actor = Actor::new(1);
        assert_eq!(actor.attribute(Some(4)), 4);
        assert_eq!(actor.attribute(None), 1);
    }
}
