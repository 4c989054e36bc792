//! # 日志配置模块
//!
//! tracing 订阅器初始化，以及带阶段/组件标签的结构化日志宏。
//!
//! 所有业务日志都通过 `linfo!` / `lwarn!` / `lerror!` / `ldebug!` 输出，参数依次为：
//! 请求ID、[`LogStage`]、[`LogComponent`]、操作名、消息，之后可以追加 tracing 字段
//! （不带结尾逗号）。

use std::env;
use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    Startup,
    Shutdown,
    RequestStart,
    Response,
    Db,
    Seeding,
    Error,
}

impl LogStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::RequestStart => "request_start",
            Self::Response => "response",
            Self::Db => "db",
            Self::Seeding => "seeding",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    Main,
    Database,
    ServerSetup,
    Deviations,
    Capa,
    Monitoring,
    Reports,
    Seed,
}

impl LogComponent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Database => "database",
            Self::ServerSetup => "server_setup",
            Self::Deviations => "deviations",
            Self::Capa => "capa",
            Self::Monitoring => "monitoring",
            Self::Reports => "reports",
            Self::Seed => "seed",
        }
    }
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __qms_log {
    ($level:ident, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(,)?) => {
        ::tracing::$level!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            "{}",
            $message
        )
    };
    ($level:ident, $request_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr, $($fields:tt)+) => {
        ::tracing::$level!(
            request_id = %$request_id,
            stage = %$stage,
            component = %$component,
            operation = %$operation,
            $($fields)+,
            "{}",
            $message
        )
    };
}

/// info 级别结构化日志
#[macro_export]
macro_rules! linfo {
    ($($args:tt)+) => {
        $crate::__qms_log!(info, $($args)+)
    };
}

/// warn 级别结构化日志
#[macro_export]
macro_rules! lwarn {
    ($($args:tt)+) => {
        $crate::__qms_log!(warn, $($args)+)
    };
}

/// error 级别结构化日志
#[macro_export]
macro_rules! lerror {
    ($($args:tt)+) => {
        $crate::__qms_log!(error, $($args)+)
    };
}

/// debug 级别结构化日志
#[macro_export]
macro_rules! ldebug {
    ($($args:tt)+) => {
        $crate::__qms_log!(debug, $($args)+)
    };
}

/// 默认过滤规则：屏蔽逐条 SQL 日志
fn default_filter(level: &str) -> String {
    format!("{level},qms_api=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn")
}

/// 初始化优化的日志系统
///
/// `RUST_LOG` 优先于 `log_level`。重复调用（例如测试中）不会 panic。
pub fn init_optimized_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| default_filter(level));

    let initialized = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            tracing_fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok();

    if initialized {
        if env::var("RUST_LOG").is_ok_and(|v| {
            v.contains("sqlx::query=info") || v.contains("sqlx::query=debug")
        }) {
            tracing::info!("🔍 SQLx database query logging enabled");
        } else {
            tracing::info!("📋 SQLx database query logging disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_silences_sql() {
        let filter = default_filter("warn");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("sqlx::query=off"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(LogStage::RequestStart.to_string(), "request_start");
        assert_eq!(LogComponent::Capa.to_string(), "capa");
    }

    #[test]
    fn test_macros_expand_with_fields() {
        init_optimized_logging(Some("debug"));
        let deviation_id = 3;
        crate::linfo!("req-1", LogStage::Db, LogComponent::Deviations, "test", "message only");
        crate::lwarn!(
            "req-1",
            LogStage::Db,
            LogComponent::Deviations,
            "test",
            &format!("with fields {deviation_id}"),
            deviation_id = deviation_id
        );
    }
}
