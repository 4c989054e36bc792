//! # 质量规则模块
//!
//! 与存储无关的纯业务规则：风险优先数、风险等级、监测限值判定、
//! 状态流转以及记录编号。

pub mod limits;
pub mod numbering;
pub mod risk;
pub mod transitions;

pub use limits::classify_reading;
pub use numbering::{RecordKind, next_record_number};
pub use risk::{RiskBand, compute_rpn};
pub use transitions::{StatusFlow, ensure_transition};
