//! # 报告服务
//!
//! 生成报告只记录元数据，不产出文件。

use chrono::NaiveDateTime;
use entity::{Reports, reports, users};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use super::shared::utc_now;
use crate::ensure_valid;
use crate::error::{Context, Result};
use crate::management::extract::Actor;

/// 未指定格式时的报告格式
pub const DEFAULT_FILE_FORMAT: &str = "PDF";

/// 生成报告请求
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReportRequest {
    pub report_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 原样序列化保存，缺省为 `{}`
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub file_format: Option<String>,
    #[serde(default)]
    pub generated_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportGenerated {
    pub id: i32,
    pub message: &'static str,
}

/// 报告列表行，带生成人姓名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct ReportListItem {
    pub id: i32,
    pub report_type: String,
    pub title: String,
    pub description: Option<String>,
    pub parameters: Option<String>,
    pub file_path: Option<String>,
    pub file_format: Option<String>,
    pub generated_at: NaiveDateTime,
    pub generated_by: Option<i32>,
    pub generated_by_name: Option<String>,
}

pub struct ReportsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReportsService<'a> {
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 报告列表，按生成时间倒序
    pub async fn list(&self) -> Result<Vec<ReportListItem>> {
        Reports::find()
            .select_only()
            .columns([
                reports::Column::Id,
                reports::Column::ReportType,
                reports::Column::Title,
                reports::Column::Description,
                reports::Column::Parameters,
                reports::Column::FilePath,
                reports::Column::FileFormat,
                reports::Column::GeneratedAt,
                reports::Column::GeneratedBy,
            ])
            .column_as(users::Column::FullName, "generated_by_name")
            .join(JoinType::LeftJoin, reports::Relation::Generator.def())
            .order_by_desc(reports::Column::GeneratedAt)
            .order_by_desc(reports::Column::Id)
            .into_model::<ReportListItem>()
            .all(self.db)
            .await
            .context("查询报告列表失败")
    }

    pub async fn generate(
        &self,
        actor: &Actor,
        request: GenerateReportRequest,
    ) -> Result<ReportGenerated> {
        ensure_valid!(
            !request.report_type.trim().is_empty(),
            field = "report_type",
            "report_type must not be empty"
        );

        let parameters = request
            .parameters
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let model = reports::ActiveModel {
            report_type: Set(request.report_type),
            title: Set(request.title),
            description: Set(request.description),
            parameters: Set(Some(serde_json::to_string(&parameters)?)),
            file_path: Set(None),
            file_format: Set(Some(
                request
                    .file_format
                    .unwrap_or_else(|| DEFAULT_FILE_FORMAT.to_string()),
            )),
            generated_at: Set(utc_now()),
            generated_by: Set(Some(actor.attribute(request.generated_by))),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(ReportGenerated {
            id: model.id,
            message: "Report generated successfully",
        })
    }
}
