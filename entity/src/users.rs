//! # 用户实体定义
//!
//! 用户基础信息表的 Sea-ORM 实体模型。其他表中的 `created_by`、`recorded_by`、
//! `generated_by`、`user_id` 字段都引用该表，但没有级联删除规则。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub department: Option<String>,
    pub created_at: DateTime,
    pub last_login: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deviations::Entity")]
    Deviations,
    #[sea_orm(has_many = "super::capa::Entity")]
    Capa,
    #[sea_orm(has_many = "super::audit_logs::Entity")]
    AuditLogs,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::deviations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deviations.def()
    }
}

impl Related<super::capa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Capa.def()
    }
}

impl Related<super::audit_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
