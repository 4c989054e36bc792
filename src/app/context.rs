//! 应用上下文
//!
//! 统一持有跨模块共享的配置与数据库连接，HTTP 层通过 `AppState` 访问。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
}

impl AppContext {
    #[must_use]
    pub const fn new(config: Arc<AppConfig>, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// 共享数据库连接
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 未携带 `X-User-Id` 时记为操作人的用户
    #[must_use]
    pub fn default_actor_id(&self) -> i32 {
        self.config.identity.default_actor_id
    }
}
