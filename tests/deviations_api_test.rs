//! # 偏差接口集成测试
//!
//! 覆盖编号分配、RPN 计算与保留、状态流转、删除语义和审计归属

mod common;

use axum::body::Body;
use axum::http::{Method, StatusCode};
use common::{TestApp, insert_user};
use entity::{AuditAction, AuditLogs, audit_logs};
use pretty_assertions::assert_eq;
use qms_api::management::middleware::REQUEST_ID_HEADER;
use qms_api::management::response::FailureLog;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde_json::json;

#[tokio::test]
async fn test_create_assigns_number_and_risk() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/deviations",
            json!({
                "title": "Temperature excursion",
                "description": "Cold room above upper limit",
                "category": "Equipment",
                "severity": 5,
                "occurrence": 4,
                "detection": 3,
                "detected_date": "2024-05-02"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Deviation created successfully");
    assert_eq!(body["deviation_number"], "DEV-2024-0001");
    assert_eq!(body["rpn"], 60);
    assert_eq!(body["risk_level"], "Medium");

    app.create_deviation(2, 2, 2).await;
    let (_, list) = app.get("/api/deviations").await;
    let numbers: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["deviation_number"].as_str().unwrap())
        .collect();
    assert!(numbers.contains(&"DEV-2024-0002"));

    let (status, stats) = app.get("/api/deviations/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["by_status"]["Open"], 2);
    assert_eq!(stats["by_category"]["Equipment"], 2);
    assert_eq!(stats["by_risk"]["Medium"], 1);
    assert_eq!(stats["by_risk"]["Low"], 1);
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/deviations", json!({"title": "No factors"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    assert_eq!(AuditLogs::find().count(app.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_missing_deviation_returns_404() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/deviations/9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Deviation not found"}));
}

#[tokio::test]
async fn test_non_numeric_id_returns_json_400() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/deviations/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid path parameter"), "{message}");
}

#[tokio::test]
async fn test_out_of_range_id_returns_404() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/deviations/99999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Resource not found"}));

    let (status, _) = app.get("/api/capa/99999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_filter_values_are_ignored() {
    let app = TestApp::spawn().await;
    let id = app.create_deviation(2, 2, 2).await;

    let (status, listed) = app.get("/api/deviations?status=&category=Equipment").await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id);

    let (_, all) = app.get("/api/deviations?status=%20&category=").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected_as_json() {
    let mut config = common::test_config();
    config.server.max_request_size = 64;
    let app = TestApp::spawn_with(config).await;

    let payload = json!({
        "title": "x".repeat(256),
        "category": "Equipment",
        "severity": 3,
        "occurrence": 3,
        "detection": 3,
        "detected_date": "2024-05-02"
    });
    let (status, body) = app.post("/api/deviations", payload).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string(), "{body}");
    assert_eq!(app.get("/api/deviations").await.1, json!([]));
}

#[tokio::test]
async fn test_failed_request_still_carries_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .send_raw(Method::GET, "/api/deviations/424242", Body::empty())
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    assert!(response.extensions().get::<FailureLog>().is_none());
    assert_eq!(
        common::body_json(response).await,
        json!({"error": "Deviation not found"})
    );
}

#[tokio::test]
async fn test_list_filters_by_status_and_category() {
    let app = TestApp::spawn().await;
    let id = app.create_deviation(3, 3, 3).await;
    app.create_deviation(4, 4, 4).await;

    let (status, _) = app
        .put(
            &format!("/api/deviations/{id}"),
            json!({"status": "Under Investigation"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, filtered) = app
        .get("/api/deviations?status=Under%20Investigation&category=Equipment")
        .await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], id);

    let (_, none) = app.get("/api/deviations?category=Documentation").await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_risk_update_keeps_rpn() {
    let app = TestApp::spawn().await;
    let id = app.create_deviation(5, 4, 3).await;

    let (status, body) = app
        .put(&format!("/api/deviations/{id}"), json!({"severity": 9}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deviation updated successfully");
    assert_eq!(body["data"]["severity"], 9);
    assert_eq!(body["data"]["rpn"], 60);

    let (_, body) = app
        .put(
            &format!("/api/deviations/{id}"),
            json!({"severity": 10, "occurrence": 5, "detection": 4}),
        )
        .await;
    assert_eq!(body["data"]["rpn"], 200);
}

#[tokio::test]
async fn test_update_ignores_protected_and_rejects_unknown_keys() {
    let app = TestApp::spawn().await;
    let id = app.create_deviation(5, 4, 3).await;

    let (status, body) = app
        .put(
            &format!("/api/deviations/{id}"),
            json!({"id": 77, "rpn": 1, "created_by": 42, "title": "Renamed"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["rpn"], 60);
    assert_eq!(body["data"]["created_by"], 1);
    assert_eq!(body["data"]["title"], "Renamed");

    let (status, body) = app
        .put(&format!("/api/deviations/{id}"), json!({"root_cause": "x"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("root_cause"));
}

#[tokio::test]
async fn test_update_missing_deviation_returns_404() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .put("/api/deviations/4242", json!({"title": "Ghost"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Deviation not found");
}

#[tokio::test]
async fn test_status_transitions_are_enforced() {
    let app = TestApp::spawn().await;
    let id = app.create_deviation(5, 4, 3).await;
    let uri = format!("/api/deviations/{id}");

    let (status, _) = app.put(&uri, json!({"status": "Closed"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(&uri, json!({"status": "CAPA Required"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Closed"));

    let (status, body) = app.put(&uri, json!({"status": "Open"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Open");
}

#[tokio::test]
async fn test_delete_writes_audit_only_when_row_existed() {
    let app = TestApp::spawn().await;
    let id = app.create_deviation(5, 4, 3).await;

    let (status, body) = app.delete("/api/deviations/9999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deviation deleted successfully");
    let deletes = AuditLogs::find()
        .filter(audit_logs::Column::Action.eq(AuditAction::Delete))
        .count(app.db())
        .await
        .unwrap();
    assert_eq!(deletes, 0);

    let (status, _) = app.delete(&format!("/api/deviations/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/deviations/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let entry = AuditLogs::find()
        .filter(audit_logs::Column::Action.eq(AuditAction::Delete))
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.entity_type, "deviation");
    assert_eq!(entry.entity_id, Some(id));
    assert_eq!(entry.changes, None);
}

#[tokio::test]
async fn test_actor_header_attributes_audit_entries() {
    let app = TestApp::spawn().await;
    let analyst = insert_user(app.db(), "rdavis", "Robert Davis").await;
    let id = app.create_deviation(5, 4, 3).await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/deviations/{id}"),
            Some(json!({"title": "Reassessed"})),
            Some(&analyst.to_string()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = AuditLogs::find()
        .order_by_asc(audit_logs::Column::Id)
        .all(app.db())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, AuditAction::Create);
    assert_eq!(entries[0].user_id, Some(1));
    assert_eq!(entries[1].action, AuditAction::Update);
    assert_eq!(entries[1].user_id, Some(analyst));

    let changes: serde_json::Value =
        serde_json::from_str(entries[1].changes.as_deref().unwrap()).unwrap();
    assert_eq!(changes, json!({"title": "Reassessed"}));
}

#[tokio::test]
async fn test_invalid_actor_header_is_rejected() {
    let app = TestApp::spawn().await;

    for bad in ["abc", "0", "-3"] {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/deviations",
                Some(json!({
                    "title": "t",
                    "description": "d",
                    "category": "Equipment",
                    "severity": 1,
                    "occurrence": 1,
                    "detection": 1,
                    "detected_date": "2024-01-01"
                })),
                Some(bad),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "header {bad}");
        assert_eq!(body["error"], "X-User-Id header must be a positive integer");
    }

    assert_eq!(
        entity::Deviations::find().count(app.db()).await.unwrap(),
        0
    );
}
