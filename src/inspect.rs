//! # 数据库概览
//!
//! 命令行 `summary` / `init` 使用：各表记录数与最近的偏差。

use std::fmt::{self, Write as _};

use entity::{Deviations, deviations};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;

use crate::database::{TableCount, table_counts};
use crate::error::{Context, Result};

/// 概览中展示的最近偏差条数
pub const RECENT_DEVIATIONS: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseSummary {
    pub tables: Vec<TableCount>,
    pub recent_deviations: Vec<deviations::Model>,
}

impl DatabaseSummary {
    pub async fn collect(db: &DatabaseConnection) -> Result<Self> {
        let tables = table_counts(db).await?;
        let recent_deviations = Deviations::find()
            .order_by_desc(deviations::Column::CreatedAt)
            .order_by_desc(deviations::Column::Id)
            .limit(RECENT_DEVIATIONS)
            .all(db)
            .await
            .context("查询最近偏差失败")?;

        Ok(Self {
            tables,
            recent_deviations,
        })
    }

    /// 某张表的记录数，表名不存在时为 `None`
    #[must_use]
    pub fn count_of(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|entry| entry.table == table)
            .map(|entry| entry.count)
    }
}

impl fmt::Display for DatabaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        let mut out = String::new();

        writeln!(out, "{rule}")?;
        writeln!(out, "Database Summary")?;
        writeln!(out, "{rule}")?;
        for entry in &self.tables {
            writeln!(out, "{:<20} {:>5} records", entry.table, entry.count)?;
        }

        writeln!(out)?;
        writeln!(out, "Recent deviations")?;
        writeln!(out, "{}", "-".repeat(60))?;
        if self.recent_deviations.is_empty() {
            writeln!(out, "(none)")?;
        }
        for deviation in &self.recent_deviations {
            writeln!(
                out,
                "{:<15} {:<20} RPN {:>4}  {}",
                deviation.deviation_number, deviation.status, deviation.rpn, deviation.title
            )?;
        }
        write!(out, "{rule}")?;

        f.write_str(&out)
    }
}
