//! # CAPA 实体定义
//!
//! 纠正与预防措施（Corrective and Preventive Action）表的 Sea-ORM 实体模型。
//! `deviation_id` 只是一个松散引用，数据库层面没有外键约束。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// CAPA 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CapaType {
    #[sea_orm(string_value = "Corrective")]
    Corrective,
    #[sea_orm(string_value = "Preventive")]
    Preventive,
    #[sea_orm(string_value = "Both")]
    Both,
}

/// CAPA 状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CapaStatus {
    #[default]
    #[sea_orm(string_value = "Open")]
    #[serde(rename = "Open")]
    Open,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Pending Verification")]
    #[serde(rename = "Pending Verification")]
    PendingVerification,
    #[sea_orm(string_value = "Effective")]
    #[serde(rename = "Effective")]
    Effective,
    #[sea_orm(string_value = "Closed")]
    #[serde(rename = "Closed")]
    Closed,
}

impl CapaStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::PendingVerification => "Pending Verification",
            Self::Effective => "Effective",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for CapaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CAPA 实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "capa")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub capa_number: String,
    pub deviation_id: Option<i32>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub capa_type: CapaType,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub root_cause: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub action_plan: String,
    pub responsible_person: String,
    pub target_date: Date,
    pub completion_date: Option<Date>,
    pub status: CapaStatus,
    pub effectiveness: Option<String>,
    pub verification_date: Option<Date>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub created_by: Option<i32>,
}

impl Model {
    /// 完成日期不晚于目标日期即视为按时关闭
    #[must_use]
    pub fn closed_on_time(&self) -> Option<bool> {
        self.completion_date.map(|done| done <= self.target_date)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deviations::Entity",
        from = "Column::DeviationId",
        to = "super::deviations::Column::Id"
    )]
    Deviation,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl Related<super::deviations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deviation.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
