//! # 偏差实体定义
//!
//! 偏差（不符合事件）表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 偏差状态
///
/// 数据库中保存为展示字符串，便于按状态分组统计时直接输出原始标签。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DeviationStatus {
    #[default]
    #[sea_orm(string_value = "Open")]
    #[serde(rename = "Open")]
    Open,
    #[sea_orm(string_value = "Under Investigation")]
    #[serde(rename = "Under Investigation")]
    UnderInvestigation,
    #[sea_orm(string_value = "CAPA Required")]
    #[serde(rename = "CAPA Required")]
    CapaRequired,
    #[sea_orm(string_value = "Closed")]
    #[serde(rename = "Closed")]
    Closed,
}

impl DeviationStatus {
    /// 展示用标签（与数据库存储值一致）
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::UnderInvestigation => "Under Investigation",
            Self::CapaRequired => "CAPA Required",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for DeviationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 偏差实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deviations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub deviation_number: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub severity: i32,
    pub occurrence: i32,
    pub detection: i32,
    /// 风险优先数 = severity × occurrence × detection
    pub rpn: i64,
    pub status: DeviationStatus,
    pub department: Option<String>,
    pub product_batch: Option<String>,
    pub detected_date: Date,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub created_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::capa::Entity")]
    Capa,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::capa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Capa.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
