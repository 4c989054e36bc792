//! # 审计日志实体定义
//!
//! 只追加的变更记录表，与被记录的业务写操作处于同一事务中。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 审计动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AuditAction {
    #[sea_orm(string_value = "CREATE")]
    #[serde(rename = "CREATE")]
    Create,
    #[sea_orm(string_value = "UPDATE")]
    #[serde(rename = "UPDATE")]
    Update,
    #[sea_orm(string_value = "DELETE")]
    #[serde(rename = "DELETE")]
    Delete,
}

/// 审计日志实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub action: AuditAction,
    /// 被操作的实体类型，如 `deviation`、`capa`
    pub entity_type: String,
    pub entity_id: Option<i32>,
    /// 请求负载的 JSON 快照
    #[sea_orm(column_type = "Text", nullable)]
    pub changes: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
