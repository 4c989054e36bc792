//! # 仪表盘、演示数据与系统路由集成测试

mod common;

use axum::http::{Method, StatusCode};
use chrono::NaiveDate;
use common::{TestApp, insert_user};
use pretty_assertions::assert_eq;
use qms_api::inspect::DatabaseSummary;
use qms_api::management::services::DashboardService;
use qms_api::seed::seed_with_rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

#[tokio::test]
async fn test_root_descriptor_and_ping() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pharmaceutical QMS API Server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["capa"], "/api/capa");

    let (status, body) = app.get("/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("pong"));
}

#[tokio::test]
async fn test_users_list_and_lookup() {
    let app = TestApp::spawn().await;
    let id = insert_user(app.db(), "mjohnson", "Mary Johnson").await;

    let (status, users) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mary Johnson", "QMS Administrator"]);

    let (status, user) = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "mjohnson");

    let (status, body) = app.get("/api/users/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_kpis_and_recent_activity() {
    let app = TestApp::spawn().await;
    let qc = insert_user(app.db(), "rdavis", "Robert Davis").await;

    let first = app.create_deviation(5, 4, 3).await;
    app.create_deviation(2, 2, 2).await;
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/deviations/{first}"),
            Some(json!({"status": "Under Investigation"})),
            Some(&qc.to_string()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, kpis) = app.get("/api/dashboard/kpis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        kpis,
        json!({
            "total_deviations": 2,
            "open_deviations": 1,
            "total_capa": 0,
            "open_capa": 0,
            "active_batches": 0,
            "out_of_spec_parameters": 0
        })
    );

    let (status, activity) = app.get("/api/dashboard/recent-activity").await;
    assert_eq!(status, StatusCode::OK);
    let activity = activity.as_array().unwrap();
    assert_eq!(activity.len(), 3);
    assert_eq!(activity[0]["action"], "UPDATE");
    assert_eq!(activity[0]["entity_type"], "deviation");
    assert_eq!(activity[0]["user_name"], "Robert Davis");
    assert_eq!(activity[2]["action"], "CREATE");
    assert_eq!(activity[2]["user_name"], "QMS Administrator");
}

#[tokio::test]
async fn test_deviation_trend_window() {
    let app = TestApp::spawn().await;
    for date in ["2023-12-15", "2024-04-02", "2024-04-20", "2024-06-30"] {
        let (status, _) = app
            .post(
                "/api/deviations",
                json!({
                    "title": "Label mix-up",
                    "description": "Wrong label lot issued",
                    "category": "Documentation",
                    "severity": 3,
                    "occurrence": 2,
                    "detection": 2,
                    "detected_date": date
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let trends = DashboardService::new(app.db())
        .trends_as_of(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
        .await
        .unwrap();

    let points: Vec<(&str, i64)> = trends
        .deviation_trend
        .iter()
        .map(|p| (p.month.as_str(), p.count))
        .collect();
    assert_eq!(points, vec![("2024-04", 2), ("2024-06", 1)]);

    let (status, body) = app.get("/api/dashboard/trends").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["deviation_trend"].is_array());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let app = TestApp::spawn().await;
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let first = seed_with_rng(app.db(), &mut rng, now).await.unwrap();
    assert_eq!(first.users, 5);
    assert_eq!(first.deviations, 25);
    assert_eq!(first.capa, 15);
    assert_eq!(first.monitoring, 100);
    assert_eq!(first.batches, 20);
    assert_eq!(first.reports, 10);

    let second = seed_with_rng(app.db(), &mut rng, now).await.unwrap();
    assert_eq!(second.total(), 0);

    let summary = DatabaseSummary::collect(app.db()).await.unwrap();
    assert_eq!(summary.count_of("users"), Some(6));
    assert_eq!(summary.count_of("deviations"), Some(25));
    assert_eq!(summary.count_of("capa"), Some(15));
    assert_eq!(summary.count_of("monitoring"), Some(100));
    assert_eq!(summary.count_of("batches"), Some(20));
    assert_eq!(summary.count_of("reports"), Some(10));
    assert_eq!(summary.count_of("audit_logs"), Some(0));
    assert_eq!(summary.recent_deviations.len(), 5);

    let (_, linked) = app.get("/api/capa/by-deviation/1").await;
    assert_eq!(linked.as_array().unwrap().len(), 1);

    let (_, batches) = app.get("/api/batches").await;
    assert_eq!(batches.as_array().unwrap().len(), 20);
}
