//! # 用户服务

use entity::{Users, users};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::error::{Context, QmsError, Result};

/// 用户服务
pub struct UsersService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UsersService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 全部用户，按姓名排序
    pub async fn list(&self) -> Result<Vec<users::Model>> {
        Users::find()
            .order_by_asc(users::Column::FullName)
            .order_by_asc(users::Column::Id)
            .all(self.db)
            .await
            .context("查询用户列表失败")
    }

    pub async fn get(&self, id: i32) -> Result<users::Model> {
        Users::find_by_id(id)
            .one(self.db)
            .await
            .with_context(|| format!("查询用户失败: {id}"))?
            .ok_or_else(|| QmsError::not_found("User", id))
    }
}
