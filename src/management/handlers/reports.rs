//! # 报告处理器

use axum::extract::State;
use axum::response::Response;

use crate::linfo;
use crate::logging::{LogComponent, LogStage};
use crate::management::extract::{Actor, ApiJson};
use crate::management::middleware::RequestId;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::{GenerateReportRequest, ReportsService};

pub async fn list_reports(State(state): State<AppState>) -> Response {
    match ReportsService::new(state.db()).list().await {
        Ok(reports) => response::success(reports),
        Err(err) => response::app_error(err),
    }
}

/// 登记一份报告（只保存元数据）
pub async fn generate_report(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiJson(request): ApiJson<GenerateReportRequest>,
) -> Response {
    let report_type = request.report_type.clone();
    match ReportsService::new(state.db()).generate(&actor, request).await {
        Ok(generated) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Reports,
                "generate_report",
                &format!("报告已登记: {report_type}"),
                report_id = generated.id
            );
            response::created(generated)
        }
        Err(err) => response::app_error(err),
    }
}
