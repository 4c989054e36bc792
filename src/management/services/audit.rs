//! # 审计日志服务
//!
//! 审计行与它描述的变更在同一个事务内写入。

use entity::{AuditAction, audit_logs};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde::Serialize;

use super::shared::utc_now;
use crate::error::{Context, Result};
use crate::management::extract::Actor;

pub const ENTITY_DEVIATION: &str = "deviation";
pub const ENTITY_CAPA: &str = "capa";

/// 待写入的审计记录
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: i32,
    pub action: AuditAction,
    pub entity_type: &'static str,
    pub entity_id: i32,
    pub changes: Option<String>,
    pub ip_address: Option<String>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(actor: &Actor, action: AuditAction, entity_type: &'static str, entity_id: i32) -> Self {
        Self {
            user_id: actor.user_id,
            action,
            entity_type,
            entity_id,
            changes: None,
            ip_address: actor.ip_address.clone(),
        }
    }

    /// 记到请求体中指定的用户名下
    #[must_use]
    pub const fn attributed_to(mut self, user_id: i32) -> Self {
        self.user_id = user_id;
        self
    }

    /// 以 JSON 形式附上请求内容
    pub fn with_changes<T: Serialize>(mut self, changes: &T) -> Result<Self> {
        self.changes = Some(serde_json::to_string(changes)?);
        Ok(self)
    }

    pub async fn write<C: ConnectionTrait>(self, conn: &C) -> Result<audit_logs::Model> {
        let Self {
            user_id,
            action,
            entity_type,
            entity_id,
            changes,
            ip_address,
        } = self;

        audit_logs::ActiveModel {
            user_id: Set(Some(user_id)),
            action: Set(action),
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(Some(entity_id)),
            changes: Set(changes),
            ip_address: Set(ip_address),
            timestamp: Set(utc_now()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .with_context(|| format!("写入审计日志失败: {entity_type} {entity_id}"))
    }
}
