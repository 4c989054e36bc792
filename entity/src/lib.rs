//! # Entity 模块
//!
//! 质量管理系统所有 Sea-ORM 实体定义

pub mod audit_logs;
pub mod batches;
pub mod capa;
pub mod deviations;
pub mod documents;
pub mod monitoring;
pub mod reports;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use batches::Entity as Batches;
pub use capa::Entity as Capa;
pub use deviations::Entity as Deviations;
pub use documents::Entity as Documents;
pub use monitoring::Entity as Monitoring;
pub use reports::Entity as Reports;
pub use users::Entity as Users;

pub use audit_logs::AuditAction;
pub use capa::{CapaStatus, CapaType};
pub use deviations::DeviationStatus;
pub use monitoring::ReadingStatus;

#[cfg(test)]
mod tests;
