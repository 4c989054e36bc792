use chrono::{Months, NaiveDate, NaiveDateTime, Utc};

/// 趋势统计回看的月数
pub const TREND_MONTHS: u32 = 6;

/// 当前 UTC 时间（无时区，按数据库存储格式）
#[must_use]
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[must_use]
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 趋势统计的起始日期（含）：`today` 往前 [`TREND_MONTHS`] 个月
///
/// 月末日期会收敛到目标月的最后一天，例如 8-31 对应 2-28/29。
#[must_use]
pub fn trend_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(TREND_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}
