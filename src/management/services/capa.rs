//! # CAPA 服务
//!
//! 纠正与预防措施的增改查、按偏差查询以及按时关闭率统计。

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use entity::{AuditAction, Capa, CapaStatus, CapaType, Deviations, capa};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait, sea_query::Expr,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::audit::{AuditEntry, ENTITY_CAPA};
use super::shared::{count_by, month_bucket, trend_cutoff, utc_now, utc_today};
use crate::ensure_valid;
use crate::error::{Context, QmsError, Result};
use crate::management::extract::Actor;
use crate::rules::{RecordKind, ensure_transition, next_record_number};

/// 创建 CAPA 请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCapaRequest {
    /// 缺省时自动分配 `CAPA-<年份>-<序号>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capa_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_id: Option<i32>,
    #[serde(rename = "type")]
    pub capa_type: CapaType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    pub action_plan: String,
    pub responsible_person: String,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CapaStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i32>,
}

/// 更新 CAPA 请求，规则同偏差更新
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCapaRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capa_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_id: Option<i32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub capa_type: Option<CapaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CapaStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<i32>,

    #[serde(default, skip_serializing)]
    pub id: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub created_by: Option<IgnoredAny>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<IgnoredAny>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapaCreated {
    pub id: i32,
    pub capa_number: String,
}

/// 单月按时关闭情况
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureTrendPoint {
    pub month: String,
    pub total: i64,
    pub on_time: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapaStats {
    pub total: u64,
    pub by_status: BTreeMap<String, i64>,
    pub by_type: BTreeMap<String, i64>,
    pub closure_trend: Vec<ClosureTrendPoint>,
}

#[derive(Debug, FromQueryResult)]
struct ClosureRow {
    month: Option<String>,
    total: i64,
    on_time: Option<i64>,
}

/// 按时关闭百分比，保留一位小数；没有关闭记录时为 0
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn on_time_percentage(on_time: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (on_time as f64 / total as f64 * 1000.0).round() / 10.0
}

/// CAPA 服务
pub struct CapaService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CapaService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<capa::Model>> {
        Capa::find()
            .order_by_desc(capa::Column::CreatedAt)
            .order_by_desc(capa::Column::Id)
            .all(self.db)
            .await
            .context("查询CAPA列表失败")
    }

    pub async fn get(&self, id: i32) -> Result<capa::Model> {
        find_existing(self.db, id).await
    }

    /// 关联到指定偏差的全部 CAPA
    pub async fn by_deviation(&self, deviation_id: i32) -> Result<Vec<capa::Model>> {
        Capa::find()
            .filter(capa::Column::DeviationId.eq(deviation_id))
            .order_by_asc(capa::Column::Id)
            .all(self.db)
            .await
            .with_context(|| format!("查询偏差关联的CAPA失败: {deviation_id}"))
    }

    pub async fn create(&self, actor: &Actor, request: CreateCapaRequest) -> Result<CapaCreated> {
        ensure_valid!(!request.title.trim().is_empty(), field = "title", "title must not be empty");
        let created_by = actor.attribute(request.created_by);
        let status = request.status.unwrap_or_default();

        let txn = self.db.begin().await.context("开启事务失败")?;

        if let Some(deviation_id) = request.deviation_id {
            ensure_deviation_exists(&txn, deviation_id).await?;
        }

        let capa_number = match request.capa_number.as_deref().map(str::trim) {
            Some("") => {
                return Err(QmsError::validation_field(
                    "capa_number",
                    "capa_number must not be empty",
                ));
            }
            Some(number) => number.to_string(),
            None => next_capa_number(&txn, utc_today().year()).await?,
        };

        let now = utc_now();
        let model = capa::ActiveModel {
            capa_number: Set(capa_number),
            deviation_id: Set(request.deviation_id),
            capa_type: Set(request.capa_type),
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            root_cause: Set(request.root_cause.clone()),
            action_plan: Set(request.action_plan.clone()),
            responsible_person: Set(request.responsible_person.clone()),
            target_date: Set(request.target_date),
            completion_date: Set((status == CapaStatus::Closed).then(utc_today)),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(created_by)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        AuditEntry::new(actor, AuditAction::Create, ENTITY_CAPA, model.id)
            .attributed_to(created_by)
            .with_changes(&request)?
            .write(&txn)
            .await?;

        txn.commit().await.context("提交CAPA创建事务失败")?;

        Ok(CapaCreated {
            id: model.id,
            capa_number: model.capa_number,
        })
    }

    /// 更新 CAPA
    ///
    /// 转入 Closed 且请求和记录都没有完成日期时，完成日期记为当天。
    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        request: UpdateCapaRequest,
    ) -> Result<capa::Model> {
        let txn = self.db.begin().await.context("开启事务失败")?;
        let current = find_existing(&txn, id).await?;

        if let Some(next) = request.status {
            ensure_transition(current.status, next)?;
        }
        if let Some(deviation_id) = request.deviation_id {
            ensure_deviation_exists(&txn, deviation_id).await?;
        }

        let stamp_completion = request.status == Some(CapaStatus::Closed)
            && request.completion_date.is_none()
            && current.completion_date.is_none();

        let mut active = current.into_active_model();
        if let Some(number) = &request.capa_number {
            ensure_valid!(
                !number.trim().is_empty(),
                field = "capa_number",
                "capa_number must not be empty"
            );
            active.capa_number = Set(number.trim().to_string());
        }
        if let Some(deviation_id) = request.deviation_id {
            active.deviation_id = Set(Some(deviation_id));
        }
        if let Some(capa_type) = request.capa_type {
            active.capa_type = Set(capa_type);
        }
        if let Some(title) = &request.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &request.description {
            active.description = Set(description.clone());
        }
        if let Some(root_cause) = &request.root_cause {
            active.root_cause = Set(Some(root_cause.clone()));
        }
        if let Some(action_plan) = &request.action_plan {
            active.action_plan = Set(action_plan.clone());
        }
        if let Some(person) = &request.responsible_person {
            active.responsible_person = Set(person.clone());
        }
        if let Some(target_date) = request.target_date {
            active.target_date = Set(target_date);
        }
        if let Some(completion_date) = request.completion_date {
            active.completion_date = Set(Some(completion_date));
        } else if stamp_completion {
            active.completion_date = Set(Some(utc_today()));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(effectiveness) = &request.effectiveness {
            active.effectiveness = Set(Some(effectiveness.clone()));
        }
        if let Some(verification_date) = request.verification_date {
            active.verification_date = Set(Some(verification_date));
        }
        active.updated_at = Set(utc_now());

        let updated = active.update(&txn).await?;

        AuditEntry::new(actor, AuditAction::Update, ENTITY_CAPA, id)
            .attributed_to(actor.attribute(request.updated_by))
            .with_changes(&request)?
            .write(&txn)
            .await?;

        txn.commit().await.context("提交CAPA更新事务失败")?;
        Ok(updated)
    }

    pub async fn stats(&self) -> Result<CapaStats> {
        self.stats_as_of(utc_today()).await
    }

    /// 以 `today` 为基准计算统计，按时关闭趋势只看目标日期在最近六个月内的已关闭记录
    pub async fn stats_as_of(&self, today: NaiveDate) -> Result<CapaStats> {
        let total = Capa::find()
            .count(self.db)
            .await
            .context("统计CAPA总数失败")?;

        let by_status = count_by::<Capa, _>(self.db, Expr::col(capa::Column::Status).into()).await?;
        let by_type = count_by::<Capa, _>(self.db, Expr::col(capa::Column::CapaType).into()).await?;
        let closure_trend = self.closure_trend(today).await?;

        Ok(CapaStats {
            total,
            by_status,
            by_type,
            closure_trend,
        })
    }

    async fn closure_trend(&self, today: NaiveDate) -> Result<Vec<ClosureTrendPoint>> {
        let bucket = month_bucket(self.db.get_database_backend(), "target_date");

        let rows = Capa::find()
            .select_only()
            .column_as(Expr::cust(bucket.clone()), "month")
            .column_as(Expr::cust("COUNT(*)"), "total")
            .column_as(
                Expr::cust("SUM(CASE WHEN completion_date <= target_date THEN 1 ELSE 0 END)"),
                "on_time",
            )
            .filter(capa::Column::Status.eq(CapaStatus::Closed))
            .filter(capa::Column::TargetDate.gte(trend_cutoff(today)))
            .group_by(Expr::cust(bucket.clone()))
            .order_by(Expr::cust(bucket), Order::Asc)
            .into_model::<ClosureRow>()
            .all(self.db)
            .await
            .context("统计CAPA按时关闭率失败")?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let on_time = row.on_time.unwrap_or(0);
                ClosureTrendPoint {
                    month: row.month.unwrap_or_default(),
                    total: row.total,
                    on_time,
                    percentage: on_time_percentage(on_time, row.total),
                }
            })
            .collect())
    }
}

async fn find_existing<C: ConnectionTrait>(db: &C, id: i32) -> Result<capa::Model> {
    Capa::find_by_id(id)
        .one(db)
        .await
        .with_context(|| format!("查询CAPA失败: {id}"))?
        .ok_or_else(|| QmsError::not_found("CAPA", id))
}

async fn ensure_deviation_exists<C: ConnectionTrait>(db: &C, deviation_id: i32) -> Result<()> {
    let exists = Deviations::find_by_id(deviation_id)
        .count(db)
        .await
        .with_context(|| format!("查询偏差失败: {deviation_id}"))?
        > 0;
    ensure_valid!(
        exists,
        field = "deviation_id",
        format!("Deviation {deviation_id} does not exist")
    );
    Ok(())
}

async fn next_capa_number<C: ConnectionTrait>(db: &C, year: i32) -> Result<String> {
    let prefix = RecordKind::Capa.prefix(year);
    let existing: Vec<String> = Capa::find()
        .select_only()
        .column(capa::Column::CapaNumber)
        .filter(capa::Column::CapaNumber.starts_with(&prefix))
        .into_tuple::<String>()
        .all(db)
        .await
        .context("查询已有CAPA编号失败")?;

    next_record_number(RecordKind::Capa, year, existing.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(3, 3, 100.0)]
    #[case(1, 3, 33.3)]
    #[case(2, 3, 66.7)]
    fn test_on_time_percentage(#[case] on_time: i64, #[case] total: i64, #[case] expected: f64) {
        assert!((on_time_percentage(on_time, total) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_accepts_type_key() {
        let request: UpdateCapaRequest =
            serde_json::from_value(json!({"type": "Preventive", "id": 3})).unwrap();
        assert_eq!(request.capa_type, Some(CapaType::Preventive));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "Preventive"})
        );
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        assert!(serde_json::from_value::<UpdateCapaRequest>(json!({"owner": "x"})).is_err());
    }
}
