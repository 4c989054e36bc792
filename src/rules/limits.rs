//! # 监测限值判定

use entity::ReadingStatus;

/// 根据上下限判定读数状态
///
/// 只有上下限都存在且都不为 0 时才判定；读数落在闭区间 `[min, max]` 外为
/// `Out of Spec`，其余情况一律 `Normal`。
#[must_use]
#[allow(clippy::float_cmp)]
pub fn classify_reading(value: f64, min_limit: Option<f64>, max_limit: Option<f64>) -> ReadingStatus {
    match (min_limit, max_limit) {
        (Some(min), Some(max)) if min != 0.0 && max != 0.0 => {
            if (min..=max).contains(&value) {
                ReadingStatus::Normal
            } else {
                ReadingStatus::OutOfSpec
            }
        }
        _ => ReadingStatus::Normal,
    }
}
