//! # 服务层共享工具
//!
//! 分组计数、按月聚合和统计时间窗口，供各域服务复用。

pub mod aggregate;
pub mod query;
pub mod time_window;

pub use aggregate::{GroupCount, MonthCount, count_by, month_bucket};
pub use query::non_empty;
pub use time_window::{TREND_MONTHS, trend_cutoff, utc_now, utc_today};

#[cfg(test)]
mod tests;
