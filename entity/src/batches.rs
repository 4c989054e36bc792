//! # 批次实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 生产批次实体，状态为自由文本（默认 `In Progress`）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub batch_number: String,
    pub product_name: String,
    pub product_code: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub status: String,
    pub start_date: Date,
    pub completion_date: Option<Date>,
    pub release_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
