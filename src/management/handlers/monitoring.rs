//! # 监测数据处理器

use axum::extract::{Query, State};
use axum::response::Response;

use crate::logging::{LogComponent, LogStage};
use crate::management::extract::{Actor, ApiJson};
use crate::management::middleware::RequestId;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::{
    MonitoringQuery, MonitoringService, ParameterType, RecordReadingRequest,
};
use crate::{linfo, lwarn};
use entity::ReadingStatus;

/// 环境监测数据，可按 `location` 过滤
pub async fn list_environmental(
    State(state): State<AppState>,
    Query(query): Query<MonitoringQuery>,
) -> Response {
    match MonitoringService::new(state.db())
        .list(ParameterType::Environmental, query.location())
        .await
    {
        Ok(readings) => response::success(readings),
        Err(err) => response::app_error(err),
    }
}

/// 工艺参数数据
pub async fn list_process(State(state): State<AppState>) -> Response {
    match MonitoringService::new(state.db())
        .list(ParameterType::Process, None)
        .await
    {
        Ok(readings) => response::success(readings),
        Err(err) => response::app_error(err),
    }
}

pub async fn record_reading(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiJson(request): ApiJson<RecordReadingRequest>,
) -> Response {
    let parameter = request.parameter_name.clone();
    match MonitoringService::new(state.db()).record(&actor, request).await {
        Ok(recorded) => {
            if recorded.status == ReadingStatus::OutOfSpec {
                lwarn!(
                    request_id,
                    LogStage::Response,
                    LogComponent::Monitoring,
                    "record_reading",
                    &format!("读数超出限值: {parameter}"),
                    reading_id = recorded.id
                );
            } else {
                linfo!(
                    request_id,
                    LogStage::Response,
                    LogComponent::Monitoring,
                    "record_reading",
                    "读数已记录",
                    reading_id = recorded.id
                );
            }
            response::created(recorded)
        }
        Err(err) => response::app_error(err),
    }
}
