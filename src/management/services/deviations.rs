//! # 偏差服务
//!
//! 偏差的增删改查与统计。写操作都在单个事务内完成，并同时写入审计日志。

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use entity::{AuditAction, DeviationStatus, Deviations, deviations};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
    sea_query::{Expr, SimpleExpr},
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::audit::{AuditEntry, ENTITY_DEVIATION};
use super::shared::{count_by, non_empty, utc_now};
use crate::error::{Context, QmsError, Result};
use crate::management::extract::Actor;
use crate::rules::{RecordKind, RiskBand, compute_rpn, ensure_transition, next_record_number};
use crate::logging::{LogComponent, LogStage};
use crate::{ensure_valid, lwarn};

/// 列表过滤条件（精确匹配，同时给出时取交集）
///
/// 空字符串视为未过滤，前端选择“全部”时会发送 `status=`。
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DeviationQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

impl DeviationQuery {
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }
}

/// 创建偏差请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeviationRequest {
    /// 缺省时自动分配 `DEV-<年份>-<序号>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_number: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub severity: i32,
    pub occurrence: i32,
    pub detection: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_batch: Option<String>,
    pub detected_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i32>,
}

/// 更新偏差请求
///
/// 只包含可修改字段，未知字段直接拒绝。`id`、`created_at`、`created_by`、
/// `rpn`、`updated_at` 允许出现（便于回传整条记录）但会被忽略。
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDeviationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<i32>,

    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_by: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub rpn: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<IgnoredAny>,
}

impl UpdateDeviationRequest {
    /// 三个风险因子齐全时才重算 RPN
    #[must_use]
    pub const fn risk_factors(&self) -> Option<(i32, i32, i32)> {
        match (self.severity, self.occurrence, self.detection) {
            (Some(s), Some(o), Some(d)) => Some((s, o, d)),
            _ => None,
        }
    }
}

/// 创建结果
#[derive(Debug, Clone, Serialize)]
pub struct DeviationCreated {
    pub id: i32,
    pub deviation_number: String,
    pub rpn: i64,
    pub risk_level: RiskBand,
}

/// 偏差统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviationStats {
    pub total: u64,
    pub by_status: BTreeMap<String, i64>,
    pub by_category: BTreeMap<String, i64>,
    pub by_risk: BTreeMap<String, i64>,
}

/// 偏差服务
pub struct DeviationsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DeviationsService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 按创建时间倒序列出偏差
    pub async fn list(&self, query: &DeviationQuery) -> Result<Vec<deviations::Model>> {
        let mut select = Deviations::find();
        if let Some(status) = query.status() {
            select = select.filter(deviations::Column::Status.eq(status));
        }
        if let Some(category) = query.category() {
            select = select.filter(deviations::Column::Category.eq(category));
        }

        select
            .order_by_desc(deviations::Column::CreatedAt)
            .order_by_desc(deviations::Column::Id)
            .all(self.db)
            .await
            .context("查询偏差列表失败")
    }

    pub async fn get(&self, id: i32) -> Result<deviations::Model> {
        find_existing(self.db, id).await
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateDeviationRequest,
    ) -> Result<DeviationCreated> {
        ensure_valid!(!request.title.trim().is_empty(), field = "title", "title must not be empty");
        ensure_valid!(
            !request.category.trim().is_empty(),
            field = "category",
            "category must not be empty"
        );
        let rpn = compute_rpn(request.severity, request.occurrence, request.detection)?;
        let created_by = actor.attribute(request.created_by);

        let txn = self.db.begin().await.context("开启事务失败")?;

        let deviation_number = match request.deviation_number.as_deref().map(str::trim) {
            Some("") => {
                return Err(QmsError::validation_field(
                    "deviation_number",
                    "deviation_number must not be empty",
                ));
            }
            Some(number) => number.to_string(),
            None => next_deviation_number(&txn, request.detected_date.year()).await?,
        };

        let now = utc_now();
        let model = deviations::ActiveModel {
            deviation_number: Set(deviation_number),
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            category: Set(request.category.clone()),
            severity: Set(request.severity),
            occurrence: Set(request.occurrence),
            detection: Set(request.detection),
            rpn: Set(rpn),
            status: Set(request.status.unwrap_or_default()),
            department: Set(request.department.clone()),
            product_batch: Set(request.product_batch.clone()),
            detected_date: Set(request.detected_date),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(created_by)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        AuditEntry::new(actor, AuditAction::Create, ENTITY_DEVIATION, model.id)
            .attributed_to(created_by)
            .with_changes(&request)?
            .write(&txn)
            .await?;

        txn.commit().await.context("提交偏差创建事务失败")?;

        Ok(DeviationCreated {
            id: model.id,
            deviation_number: model.deviation_number,
            rpn: model.rpn,
            risk_level: RiskBand::from_rpn(model.rpn),
        })
    }

    /// 更新偏差；状态变更必须符合流转规则
    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        request: UpdateDeviationRequest,
    ) -> Result<deviations::Model> {
        let txn = self.db.begin().await.context("开启事务失败")?;
        let current = find_existing(&txn, id).await?;

        if let Some(next) = request.status {
            ensure_transition(current.status, next)?;
        }

        let mut active = current.into_active_model();
        if let Some(number) = &request.deviation_number {
            ensure_valid!(
                !number.trim().is_empty(),
                field = "deviation_number",
                "deviation_number must not be empty"
            );
            active.deviation_number = Set(number.trim().to_string());
        }
        if let Some(title) = &request.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &request.description {
            active.description = Set(description.clone());
        }
        if let Some(category) = &request.category {
            active.category = Set(category.clone());
        }
        if let Some(severity) = request.severity {
            active.severity = Set(severity);
        }
        if let Some(occurrence) = request.occurrence {
            active.occurrence = Set(occurrence);
        }
        if let Some(detection) = request.detection {
            active.detection = Set(detection);
        }
        if let Some((severity, occurrence, detection)) = request.risk_factors() {
            active.rpn = Set(compute_rpn(severity, occurrence, detection)?);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(department) = &request.department {
            active.department = Set(Some(department.clone()));
        }
        if let Some(batch) = &request.product_batch {
            active.product_batch = Set(Some(batch.clone()));
        }
        if let Some(detected_date) = request.detected_date {
            active.detected_date = Set(detected_date);
        }
        active.updated_at = Set(utc_now());

        let updated = active.update(&txn).await?;

        AuditEntry::new(actor, AuditAction::Update, ENTITY_DEVIATION, id)
            .attributed_to(actor.attribute(request.updated_by))
            .with_changes(&request)?
            .write(&txn)
            .await?;

        txn.commit().await.context("提交偏差更新事务失败")?;
        Ok(updated)
    }

    /// 硬删除偏差，不级联关联的 CAPA
    ///
    /// 返回是否真的删除了记录；记录不存在时不写审计日志。
    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<bool> {
        let txn = self.db.begin().await.context("开启事务失败")?;

        let result = Deviations::delete_by_id(id)
            .exec(&txn)
            .await
            .with_context(|| format!("删除偏差失败: {id}"))?;

        if result.rows_affected == 0 {
            lwarn!(
                "system",
                LogStage::Db,
                LogComponent::Deviations,
                "delete_deviation",
                "待删除的偏差不存在",
                deviation_id = id
            );
            return Ok(false);
        }

        AuditEntry::new(actor, AuditAction::Delete, ENTITY_DEVIATION, id)
            .write(&txn)
            .await?;

        txn.commit().await.context("提交偏差删除事务失败")?;
        Ok(true)
    }

    /// 总数以及按状态、类别、风险等级的分组计数
    pub async fn stats(&self) -> Result<DeviationStats> {
        let total = Deviations::find()
            .count(self.db)
            .await
            .context("统计偏差总数失败")?;

        let by_status =
            count_by::<Deviations, _>(self.db, Expr::col(deviations::Column::Status).into()).await?;
        let by_category =
            count_by::<Deviations, _>(self.db, Expr::col(deviations::Column::Category).into())
                .await?;
        let risk_case: SimpleExpr = Expr::cust(RiskBand::sql_case("rpn"));
        let by_risk = count_by::<Deviations, _>(self.db, risk_case).await?;

        Ok(DeviationStats {
            total,
            by_status,
            by_category,
            by_risk,
        })
    }
}

async fn find_existing<C: ConnectionTrait>(db: &C, id: i32) -> Result<deviations::Model> {
    Deviations::find_by_id(id)
        .one(db)
        .await
        .with_context(|| format!("查询偏差失败: {id}"))?
        .ok_or_else(|| QmsError::not_found("Deviation", id))
}

/// 在当前事务内为指定年份分配下一个偏差编号
async fn next_deviation_number<C: ConnectionTrait>(db: &C, year: i32) -> Result<String> {
    let prefix = RecordKind::Deviation.prefix(year);
    let existing: Vec<String> = Deviations::find()
        .select_only()
        .column(deviations::Column::DeviationNumber)
        .filter(deviations::Column::DeviationNumber.starts_with(&prefix))
        .into_tuple::<String>()
        .all(db)
        .await
        .context("查询已有偏差编号失败")?;

    next_record_number(RecordKind::Deviation, year, existing.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_rejects_unknown_fields() {
        let err = serde_json::from_value::<UpdateDeviationRequest>(json!({"rpn_override": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_update_ignores_protected_fields() {
        let request: UpdateDeviationRequest = serde_json::from_value(json!({
            "id": 7,
            "created_at": "2024-01-01T00:00:00",
            "created_by": 1,
            "rpn": 999,
            "title": "Updated"
        }))
        .unwrap();

        assert_eq!(request.title.as_deref(), Some("Updated"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"title": "Updated"})
        );
    }

    #[test]
    fn test_risk_factors_require_all_three() {
        let partial = UpdateDeviationRequest {
            severity: Some(9),
            ..Default::default()
        };
        assert_eq!(partial.risk_factors(), None);

        let full = UpdateDeviationRequest {
            severity: Some(2),
            occurrence: Some(3),
            detection: Some(4),
            ..Default::default()
        };
        assert_eq!(full.risk_factors(), Some((2, 3, 4)));
    }
}
