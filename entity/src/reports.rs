//! # 报告实体定义
//!
//! 报告只保存元数据，`parameters` 为序列化后的 JSON 文本，不生成实际文件。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 报告元数据实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub report_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub parameters: Option<String>,
    pub file_path: Option<String>,
    pub file_format: Option<String>,
    pub generated_at: DateTime,
    pub generated_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::GeneratedBy",
        to = "super::users::Column::Id"
    )]
    Generator,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Generator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
