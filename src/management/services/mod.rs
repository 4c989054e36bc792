//! # 服务层
//!
//! 各资源的业务逻辑，供 HTTP handler 与命令行工具复用。

pub mod audit;
pub mod batches;
pub mod capa;
pub mod dashboard;
pub mod deviations;
pub mod monitoring;
pub mod reports;
pub mod shared;
pub mod users;

pub use audit::AuditEntry;
pub use batches::BatchesService;
pub use capa::{CapaService, CreateCapaRequest, UpdateCapaRequest};
pub use dashboard::DashboardService;
pub use deviations::{
    CreateDeviationRequest, DeviationQuery, DeviationsService, UpdateDeviationRequest,
};
pub use monitoring::{MonitoringQuery, MonitoringService, ParameterType, RecordReadingRequest};
pub use reports::{GenerateReportRequest, ReportsService};
pub use users::UsersService;
