//! # 风险优先数与风险等级

use serde::Serialize;

use crate::error::{QmsError, Result};

/// Critical 等级下限（含）
pub const CRITICAL_THRESHOLD: i64 = 200;
/// High 等级下限（含）
pub const HIGH_THRESHOLD: i64 = 100;
/// Medium 等级下限（含）
pub const MEDIUM_THRESHOLD: i64 = 40;

/// 计算风险优先数 RPN = severity × occurrence × detection
///
/// 使用 64 位带溢出检查的乘法，溢出返回校验错误。
pub fn compute_rpn(severity: i32, occurrence: i32, detection: i32) -> Result<i64> {
    i64::from(severity)
        .checked_mul(i64::from(occurrence))
        .and_then(|partial| partial.checked_mul(i64::from(detection)))
        .ok_or_else(|| {
            QmsError::validation_field(
                "rpn",
                format!(
                    "Risk priority number overflows: {severity} x {occurrence} x {detection}"
                ),
            )
        })
}

/// 由 RPN 派生的风险等级，区间下限闭合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskBand {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskBand {
    /// 从高到低排列的全部等级
    pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub const fn from_rpn(rpn: i64) -> Self {
        if rpn >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if rpn >= HIGH_THRESHOLD {
            Self::High
        } else if rpn >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// 等级下限，`Low` 没有下限
    #[must_use]
    pub const fn lower_bound(self) -> Option<i64> {
        match self {
            Self::Critical => Some(CRITICAL_THRESHOLD),
            Self::High => Some(HIGH_THRESHOLD),
            Self::Medium => Some(MEDIUM_THRESHOLD),
            Self::Low => None,
        }
    }

    /// 生成与 [`RiskBand::from_rpn`] 等价的 SQL `CASE` 表达式
    #[must_use]
    pub fn sql_case(column: &str) -> String {
        let arms: String = Self::ALL
            .iter()
            .filter_map(|band| {
                band.lower_bound()
                    .map(|bound| format!("WHEN {column} >= {bound} THEN '{}' ", band.as_str()))
            })
            .collect();
        format!("CASE {arms}ELSE '{}' END", Self::Low.as_str())
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
