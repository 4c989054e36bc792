//! # 批次服务

use entity::{Batches, batches};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::error::{Context, Result};

pub struct BatchesService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BatchesService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 全部批次，按开始日期倒序
    pub async fn list(&self) -> Result<Vec<batches::Model>> {
        Batches::find()
            .order_by_desc(batches::Column::StartDate)
            .order_by_desc(batches::Column::Id)
            .all(self.db)
            .await
            .context("查询批次列表失败")
    }
}
