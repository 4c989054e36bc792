//! # CAPA 处理器

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::linfo;
use crate::logging::{LogComponent, LogStage};
use crate::management::extract::{Actor, ApiJson, ApiPath};
use crate::management::middleware::RequestId;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::capa::CapaCreated;
use crate::management::services::{CapaService, CreateCapaRequest, UpdateCapaRequest};

#[derive(Debug, Serialize)]
struct CreatedBody {
    message: &'static str,
    #[serde(flatten)]
    capa: CapaCreated,
}

#[derive(Debug, Serialize)]
struct UpdatedBody<T: Serialize> {
    message: &'static str,
    data: T,
}

pub async fn list_capa(State(state): State<AppState>) -> Response {
    match CapaService::new(state.db()).list().await {
        Ok(records) => response::success(records),
        Err(err) => response::app_error(err),
    }
}

pub async fn get_capa(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Response {
    match CapaService::new(state.db()).get(id).await {
        Ok(record) => response::success(record),
        Err(err) => response::app_error(err),
    }
}

/// 指定偏差下的 CAPA，没有时返回空数组
pub async fn capa_by_deviation(
    State(state): State<AppState>,
    ApiPath(deviation_id): ApiPath<i32>,
) -> Response {
    match CapaService::new(state.db()).by_deviation(deviation_id).await {
        Ok(records) => response::success(records),
        Err(err) => response::app_error(err),
    }
}

pub async fn create_capa(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiJson(request): ApiJson<CreateCapaRequest>,
) -> Response {
    match CapaService::new(state.db()).create(&actor, request).await {
        Ok(capa) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Capa,
                "create_capa",
                &format!("CAPA已创建: {}", capa.capa_number),
                capa_id = capa.id,
                user_id = actor.user_id
            );
            response::created(CreatedBody {
                message: "CAPA created successfully",
                capa,
            })
        }
        Err(err) => response::app_error(err),
    }
}

pub async fn update_capa(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: Actor,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateCapaRequest>,
) -> Response {
    match CapaService::new(state.db()).update(&actor, id, request).await {
        Ok(capa) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Capa,
                "update_capa",
                "CAPA已更新",
                capa_id = id,
                status = %capa.status,
                user_id = actor.user_id
            );
            response::success(UpdatedBody {
                message: "CAPA updated successfully",
                data: capa,
            })
        }
        Err(err) => response::app_error(err),
    }
}

pub async fn capa_stats(State(state): State<AppState>) -> Response {
    match CapaService::new(state.db()).stats().await {
        Ok(stats) => response::success(stats),
        Err(err) => response::app_error(err),
    }
}
