//! # 错误类型定义

use axum::http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use super::ErrorCategory;

/// 5xx 响应对外暴露的通用信息，完整错误链只写入日志
const GENERIC_SERVER_MESSAGE: &str = "Internal server error";

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum QmsError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 请求数据校验错误
    #[error("校验错误: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// 资源未找到
    #[error("资源未找到: {resource} {identifier}")]
    NotFound {
        resource: String,
        identifier: String,
    },

    /// 唯一约束等资源冲突
    #[error("资源冲突: {message}")]
    Conflict {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 不允许的状态流转
    #[error("状态流转非法: {resource} {from} -> {to}")]
    InvalidTransition {
        resource: String,
        from: String,
        to: String,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// 服务器启动错误
    #[error("服务器启动错误: {message}")]
    ServerStart {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 附加了上下文信息的错误
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<QmsError>,
    },
}

impl QmsError {
    /// 将错误转换为HTTP状态码和错误代码
    #[must_use]
    pub fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::InvalidTransition { .. } => (StatusCode::BAD_REQUEST, "INVALID_TRANSITION"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "RESOURCE_CONFLICT"),
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            Self::Serialization { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            Self::ServerStart { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_START_ERROR"),
            Self::Context { source, .. } => source.to_http_response_parts(),
        }
    }

    /// 错误归类：4xx 为客户端错误，其余为服务端错误
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        if self.to_http_response_parts().0.is_client_error() {
            ErrorCategory::Client
        } else {
            ErrorCategory::Server
        }
    }

    /// 返回给客户端的错误信息（响应体 `{"error": ...}` 中的内容）
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation { message, .. } | Self::Conflict { message, .. } => message.clone(),
            Self::NotFound { resource, .. } => format!("{resource} not found"),
            Self::InvalidTransition { resource, from, to } => {
                format!("Invalid {resource} status transition: {from} -> {to}")
            }
            Self::Context { source, .. } => source.client_message(),
            _ => GENERIC_SERVER_MESSAGE.to_string(),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建校验错误
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// 创建指向具体字段的校验错误
    pub fn validation_field<F: Into<String>, T: Into<String>>(field: F, message: T) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// 创建资源未找到错误，`resource` 使用对外展示的名称（如 `Deviation`）
    pub fn not_found<T: Into<String>, I: ToString>(resource: T, identifier: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.to_string(),
        }
    }

    /// 创建状态流转错误
    pub fn invalid_transition<R, F, T>(resource: R, from: F, to: T) -> Self
    where
        R: Into<String>,
        F: ToString,
        T: ToString,
    {
        Self::InvalidTransition {
            resource: resource.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// 创建带来源的服务器启动错误
    pub fn server_start_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::ServerStart {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

// 自动转换常见错误类型
impl From<std::io::Error> for QmsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for QmsError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<serde_json::Error> for QmsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON处理失败".to_string(),
            source: err.into(),
        }
    }
}

impl From<DbErr> for QmsError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict {
                message: format!("Record already exists: {detail}"),
                source: Some(err.into()),
            },
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::validation("Referenced record does not exist")
            }
            _ => Self::database_with_source("数据库操作失败", err),
        }
    }
}
