//! # 状态流转规则
//!
//! 偏差与 CAPA 的状态都是封闭枚举，更新时只允许图中列出的流转。
//! 保持原状态总是允许的。

use entity::{CapaStatus, DeviationStatus};

use crate::error::{QmsError, Result};

/// 带流转图的状态枚举
pub trait StatusFlow: Copy + Eq + std::fmt::Display + 'static {
    /// 出现在错误信息中的资源名
    const RESOURCE: &'static str;

    /// 从当前状态可以直接到达的状态（不含自身）
    fn successors(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self == next || self.successors().contains(&next)
    }
}

impl StatusFlow for DeviationStatus {
    const RESOURCE: &'static str = "deviation";

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::UnderInvestigation, Self::CapaRequired, Self::Closed],
            Self::UnderInvestigation => &[Self::CapaRequired, Self::Closed],
            Self::CapaRequired => &[Self::UnderInvestigation, Self::Closed],
            Self::Closed => &[Self::Open],
        }
    }
}

impl StatusFlow for CapaStatus {
    const RESOURCE: &'static str = "CAPA";

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::InProgress, Self::Closed],
            Self::InProgress => &[Self::PendingVerification, Self::Closed],
            Self::PendingVerification => &[Self::Effective, Self::InProgress],
            Self::Effective => &[Self::Closed],
            Self::Closed => &[],
        }
    }
}

/// 校验状态流转，不允许时返回 [`QmsError::InvalidTransition`]
pub fn ensure_transition<S: StatusFlow>(from: S, to: S) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(QmsError::invalid_transition(S::RESOURCE, from, to))
    }
}
