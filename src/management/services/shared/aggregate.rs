use std::collections::BTreeMap;

use sea_orm::{
    ConnectionTrait, DatabaseBackend, EntityName, EntityTrait, FromQueryResult, QuerySelect,
    sea_query::{Expr, SimpleExpr},
};

use crate::error::{Context, Result};

/// `GROUP BY` 分组计数行
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct GroupCount {
    pub label: Option<String>,
    pub count: i64,
}

/// 按月分组计数行，`month` 形如 `2024-05`
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct MonthCount {
    pub month: Option<String>,
    pub count: i64,
}

/// 对实体按表达式分组计数，返回 `{标签: 数量}`
///
/// 标签为 NULL 的分组记为 `Unknown`。
pub async fn count_by<E, C>(db: &C, group: SimpleExpr) -> Result<BTreeMap<String, i64>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let rows = E::find()
        .select_only()
        .column_as(group.clone(), "label")
        .column_as(Expr::cust("COUNT(*)"), "count")
        .group_by(group)
        .into_model::<GroupCount>()
        .all(db)
        .await
        .with_context(|| format!("分组统计失败: {}", E::default().table_name()))?;

    Ok(rows
        .into_iter()
        .map(|row| (row.label.unwrap_or_else(|| "Unknown".to_string()), row.count))
        .collect())
}

/// 将日期列截断到月份的 SQL 表达式
#[must_use]
pub fn month_bucket(backend: DatabaseBackend, column: &str) -> String {
    match backend {
        DatabaseBackend::Postgres => format!("to_char({column}, 'YYYY-MM')"),
        DatabaseBackend::MySql => format!("DATE_FORMAT({column}, '%Y-%m')"),
        _ => format!("strftime('%Y-%m', {column})"),
    }
}
