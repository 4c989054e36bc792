//! # HTTP 处理器
//!
//! 每个处理器只负责解析请求、调用服务并组织响应。

pub mod batches;
pub mod capa;
pub mod dashboard;
pub mod deviations;
pub mod monitoring;
pub mod reports;
pub mod system;
pub mod users;
