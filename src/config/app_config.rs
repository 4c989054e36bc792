//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use crate::ensure_config;
use crate::error::Result;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 默认操作人配置
    pub identity: IdentityConfig,
    /// 示例数据配置
    pub seed: SeedConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 允许的跨域来源，包含 `*` 或为空时允许所有来源
    pub cors_origins: Vec<String>,
    /// 请求体大小上限（字节）
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_origins: vec!["*".to_string()],
            max_request_size: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// 监听地址字符串，如 `0.0.0.0:5000`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 是否允许所有跨域来源
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// 默认操作人配置
///
/// 请求没有携带 `X-User-Id` 时，变更记录归属到该用户。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub default_actor_id: i32,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            default_actor_id: 1,
        }
    }
}

/// 示例数据配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// 服务启动时写入示例数据
    pub on_startup: bool,
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.server.port != 0, "无效的服务器端口: 0");
        ensure_config!(!self.server.host.is_empty(), "服务器监听地址不能为空");
        ensure_config!(self.server.max_request_size > 0, "请求体大小上限必须大于0");
        ensure_config!(!self.database.url.is_empty(), "数据库URL不能为空");
        ensure_config!(self.database.max_connections > 0, "数据库最大连接数必须大于0");
        ensure_config!(
            self.identity.default_actor_id > 0,
            "默认操作人ID必须大于0: {}",
            self.identity.default_actor_id
        );
        Ok(())
    }
}
