//! # 监测数据服务

use entity::{Monitoring, ReadingStatus, monitoring};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use super::shared::{non_empty, utc_now};
use crate::ensure_valid;
use crate::error::{Context, Result};
use crate::management::extract::Actor;
use crate::rules::classify_reading;

/// 列表接口最多返回的条数
pub const LIST_LIMIT: u64 = 100;

/// 未指定告警级别时写入的值
pub const DEFAULT_ALERT_LEVEL: &str = "None";

/// 监测参数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    Environmental,
    Process,
}

impl ParameterType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Process => "Process",
        }
    }
}

/// 监测列表过滤条件，空的 `location` 视为未过滤
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MonitoringQuery {
    pub location: Option<String>,
}

impl MonitoringQuery {
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        non_empty(self.location.as_deref())
    }
}

/// 记录监测数据请求
#[derive(Debug, Clone, Deserialize)]
pub struct RecordReadingRequest {
    pub location: String,
    pub parameter_type: String,
    pub parameter_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min_limit: Option<f64>,
    #[serde(default)]
    pub max_limit: Option<f64>,
    #[serde(default)]
    pub alert_level: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadingRecorded {
    pub id: i32,
    pub status: ReadingStatus,
}

/// 监测数据服务
pub struct MonitoringService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MonitoringService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 指定类型的最近读数，可按位置过滤
    pub async fn list(
        &self,
        parameter_type: ParameterType,
        location: Option<&str>,
    ) -> Result<Vec<monitoring::Model>> {
        let mut select =
            Monitoring::find().filter(monitoring::Column::ParameterType.eq(parameter_type.as_str()));
        if let Some(location) = location {
            select = select.filter(monitoring::Column::Location.eq(location));
        }

        select
            .order_by_desc(monitoring::Column::RecordedAt)
            .order_by_desc(monitoring::Column::Id)
            .limit(LIST_LIMIT)
            .all(self.db)
            .await
            .with_context(|| format!("查询{}监测数据失败", parameter_type.as_str()))
    }

    /// 记录一条读数，状态按限值判定
    pub async fn record(&self, actor: &Actor, request: RecordReadingRequest) -> Result<ReadingRecorded> {
        ensure_valid!(request.value.is_finite(), field = "value", "value must be a finite number");
        ensure_valid!(
            !request.parameter_name.trim().is_empty(),
            field = "parameter_name",
            "parameter_name must not be empty"
        );

        let status = classify_reading(request.value, request.min_limit, request.max_limit);

        let model = monitoring::ActiveModel {
            location: Set(request.location),
            parameter_type: Set(request.parameter_type),
            parameter_name: Set(request.parameter_name),
            value: Set(request.value),
            unit: Set(request.unit),
            min_limit: Set(request.min_limit),
            max_limit: Set(request.max_limit),
            status: Set(status),
            alert_level: Set(Some(
                request
                    .alert_level
                    .unwrap_or_else(|| DEFAULT_ALERT_LEVEL.to_string()),
            )),
            recorded_at: Set(utc_now()),
            recorded_by: Set(Some(actor.attribute(request.recorded_by))),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(ReadingRecorded {
            id: model.id,
            status: model.status,
        })
    }
}
