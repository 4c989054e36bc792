//! # 记录编号
//!
//! 未指定编号时自动分配 `DEV-<年份>-<序号>` / `CAPA-<年份>-<序号>`，
//! 序号为四位补零。

use crate::error::Result;

/// 需要编号的记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Deviation,
    Capa,
}

impl RecordKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Deviation => "DEV",
            Self::Capa => "CAPA",
        }
    }

    /// 指定年份的编号前缀，如 `DEV-2024-`
    #[must_use]
    pub fn prefix(self, year: i32) -> String {
        format!("{}-{year}-", self.code())
    }

    #[must_use]
    pub fn format(self, year: i32, sequence: impl Into<u128>) -> String {
        let sequence = sequence.into();
        format!("{}{sequence:04}", self.prefix(year))
    }
}

/// 根据同前缀的已有编号计算下一个编号
///
/// 取已有编号中可解析的最大序号加一；无法解析的编号（手工录入）只按数量计入。
/// 序号用尽时返回校验错误，而不是重复分配同一个编号。
pub fn next_record_number<'a, I>(kind: RecordKind, year: i32, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = kind.prefix(year);
    let (count, highest) = existing
        .into_iter()
        .filter_map(|number| number.strip_prefix(&prefix))
        .fold((0u128, 0u128), |(count, highest), suffix| {
            let parsed = suffix.parse::<u128>().unwrap_or(0);
            (count + 1, highest.max(parsed))
        });

    let next = highest.max(count).checked_add(1).ok_or_else(|| {
        crate::validation_error!("{}{} 之后没有可用的编号，请手工指定", prefix, highest)
    })?;
    Ok(kind.format(year, next))
}
