//! # 仪表盘服务
//!
//! 只读汇总：KPI 计数、近六个月偏差趋势、最近操作记录。

use chrono::{NaiveDate, NaiveDateTime};
use entity::{
    AuditLogs, Batches, Capa, CapaStatus, DeviationStatus, Deviations, Monitoring, ReadingStatus,
    audit_logs, batches, capa, deviations, monitoring, users,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, sea_query::Expr,
};
use serde::Serialize;

use super::shared::{MonthCount, month_bucket, trend_cutoff, utc_today};
use crate::error::{Context, Result};

/// 视为“生产中”的批次状态
pub const ACTIVE_BATCH_STATUS: &str = "In Progress";

/// 最近操作记录条数
pub const RECENT_ACTIVITY_LIMIT: u64 = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardKpis {
    pub total_deviations: u64,
    pub open_deviations: u64,
    pub total_capa: u64,
    pub open_capa: u64,
    pub active_batches: u64,
    pub out_of_spec_parameters: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardTrends {
    pub deviation_trend: Vec<TrendPoint>,
}

/// 审计记录，带操作人姓名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct ActivityItem {
    pub id: i32,
    pub user_id: Option<i32>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i32>,
    pub changes: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: NaiveDateTime,
    pub user_name: Option<String>,
}

pub struct DashboardService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DashboardService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn kpis(&self) -> Result<DashboardKpis> {
        let db = self.db;
        Ok(DashboardKpis {
            total_deviations: Deviations::find()
                .count(db)
                .await
                .context("统计偏差总数失败")?,
            open_deviations: Deviations::find()
                .filter(deviations::Column::Status.eq(DeviationStatus::Open))
                .count(db)
                .await
                .context("统计未关闭偏差失败")?,
            total_capa: Capa::find().count(db).await.context("统计CAPA总数失败")?,
            open_capa: Capa::find()
                .filter(capa::Column::Status.eq(CapaStatus::Open))
                .count(db)
                .await
                .context("统计未关闭CAPA失败")?,
            active_batches: Batches::find()
                .filter(batches::Column::Status.eq(ACTIVE_BATCH_STATUS))
                .count(db)
                .await
                .context("统计生产中批次失败")?,
            out_of_spec_parameters: Monitoring::find()
                .filter(monitoring::Column::Status.eq(ReadingStatus::OutOfSpec))
                .count(db)
                .await
                .context("统计超限读数失败")?,
        })
    }

    pub async fn trends(&self) -> Result<DashboardTrends> {
        self.trends_as_of(utc_today()).await
    }

    /// 发现日期不早于 `today` 前六个月的偏差，按月计数
    pub async fn trends_as_of(&self, today: NaiveDate) -> Result<DashboardTrends> {
        let bucket = month_bucket(self.db.get_database_backend(), "detected_date");

        let rows = Deviations::find()
            .select_only()
            .column_as(Expr::cust(bucket.clone()), "month")
            .column_as(Expr::cust("COUNT(*)"), "count")
            .filter(deviations::Column::DetectedDate.gte(trend_cutoff(today)))
            .group_by(Expr::cust(bucket.clone()))
            .order_by(Expr::cust(bucket), Order::Asc)
            .into_model::<MonthCount>()
            .all(self.db)
            .await
            .context("统计偏差月度趋势失败")?;

        Ok(DashboardTrends {
            deviation_trend: rows
                .into_iter()
                .map(|row| TrendPoint {
                    month: row.month.unwrap_or_default(),
                    count: row.count,
                })
                .collect(),
        })
    }

    /// 最近的审计记录
    pub async fn recent_activity(&self) -> Result<Vec<ActivityItem>> {
        AuditLogs::find()
            .select_only()
            .columns([
                audit_logs::Column::Id,
                audit_logs::Column::UserId,
                audit_logs::Column::Action,
                audit_logs::Column::EntityType,
                audit_logs::Column::EntityId,
                audit_logs::Column::Changes,
                audit_logs::Column::IpAddress,
                audit_logs::Column::Timestamp,
            ])
            .column_as(users::Column::FullName, "user_name")
            .join(JoinType::LeftJoin, audit_logs::Relation::User.def())
            .order_by_desc(audit_logs::Column::Timestamp)
            .order_by_desc(audit_logs::Column::Id)
            .limit(RECENT_ACTIVITY_LIMIT)
            .into_model::<ActivityItem>()
            .all(self.db)
            .await
            .context("查询最近操作记录失败")
    }
}
