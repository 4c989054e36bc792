//! # 偏差处理器

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Serialize;

use crate::{ldebug, linfo};
use crate::logging::{LogComponent, LogStage};
use crate::management::extract::{Actor, ApiJson, ApiPath};
use crate::management::middleware::RequestId;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::deviations::DeviationCreated;
use crate::management::services::{
    CreateDeviationRequest, DeviationQuery, DeviationsService, UpdateDeviationRequest,
};

#[derive(Debug, Serialize)]
struct CreatedBody {
    message: &'static str,
    #[serde(flatten)]
    deviation: DeviationCreated,
}

#[derive(Debug, Serialize)]
struct MessageBody<T: Serialize> {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// 列出偏差，支持 `status` / `category` 过滤
pub async fn list_deviations(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<DeviationQuery>,
) -> Response {
    ldebug!(
        request_id,
        LogStage::RequestStart,
        LogComponent::Deviations,
        "list_deviations",
        "查询偏差列表",
        status = ?query.status(),
        category = ?query.category()
    );
    match DeviationsService::new(state.db()).list(&query).await {
        Ok(deviations) => response::success(deviations),
        Err(err) => response::app_error(err),
    }
}

pub async fn get_deviation(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Response {
    match DeviationsService::new(state.db()).get(id).await {
        Ok(deviation) => response::success(deviation),
        Err(err) => response::app_error(err),
    }
}

pub async fn create_deviation(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiJson(request): ApiJson<CreateDeviationRequest>,
) -> Response {
    match DeviationsService::new(state.db()).create(&actor, request).await {
        Ok(deviation) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Deviations,
                "create_deviation",
                &format!("偏差已创建: {}", deviation.deviation_number),
                deviation_id = deviation.id,
                rpn = deviation.rpn,
                user_id = actor.user_id
            );
            response::created(CreatedBody {
                message: "Deviation created successfully",
                deviation,
            })
        }
        Err(err) => response::app_error(err),
    }
}

pub async fn update_deviation(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateDeviationRequest>,
) -> Response {
    match DeviationsService::new(state.db()).update(&actor, id, request).await {
        Ok(deviation) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Deviations,
                "update_deviation",
                "偏差已更新",
                deviation_id = id,
                status = %deviation.status,
                user_id = actor.user_id
            );
            response::success(MessageBody {
                message: "Deviation updated successfully",
                data: Some(deviation),
            })
        }
        Err(err) => response::app_error(err),
    }
}

/// 删除偏差；记录不存在时同样返回成功
pub async fn delete_deviation(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiPath(id): ApiPath<i32>,
) -> Response {
    match DeviationsService::new(state.db()).delete(&actor, id).await {
        Ok(deleted) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Deviations,
                "delete_deviation",
                "偏差删除请求已处理",
                deviation_id = id,
                deleted = deleted
            );
            response::success(MessageBody::<()> {
                message: "Deviation deleted successfully",
                data: None,
            })
        }
        Err(err) => response::app_error(err),
    }
}

pub async fn deviation_stats(State(state): State<AppState>) -> Response {
    match DeviationsService::new(state.db()).stats().await {
        Ok(stats) => response::success(stats),
        Err(err) => response::app_error(err),
    }
}
