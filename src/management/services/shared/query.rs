//! 查询参数归一化

/// 去掉首尾空白后为空的过滤值按未提供处理
#[must_use]
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
