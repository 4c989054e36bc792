//! # 监测数据与报告接口集成测试

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, insert_user};
use pretty_assertions::assert_eq;
use serde_json::json;

fn reading(location: &str, parameter_type: &str, value: f64) -> serde_json::Value {
    json!({
        "location": location,
        "parameter_type": parameter_type,
        "parameter_name": "Temperature",
        "value": value,
        "unit": "°C",
        "min_limit": 20.0,
        "max_limit": 24.0
    })
}

#[tokio::test]
async fn test_record_classifies_against_limits() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/monitoring/record", reading("Clean Room A", "Environmental", 25.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Out of Spec");

    let (status, body) = app
        .post("/api/monitoring/record", reading("Clean Room A", "Environmental", 24.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Normal");

    let (status, body) = app
        .post(
            "/api/monitoring/record",
            json!({
                "location": "Production Area",
                "parameter_type": "Process",
                "parameter_name": "pH",
                "value": 1000.0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Normal");

    let (_, kpis) = app.get("/api/dashboard/kpis").await;
    assert_eq!(kpis["out_of_spec_parameters"], 1);
}

#[tokio::test]
async fn test_record_rejects_blank_parameter_name() {
    let app = TestApp::spawn().await;
    let mut body = reading("Clean Room A", "Environmental", 21.0);
    body["parameter_name"] = json!("  ");

    let (status, body) = app.post("/api/monitoring/record", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "parameter_name must not be empty");
}

#[tokio::test]
async fn test_lists_split_by_parameter_type_and_location() {
    let app = TestApp::spawn().await;
    for (location, kind) in [
        ("Clean Room A", "Environmental"),
        ("Clean Room B", "Environmental"),
        ("Production Area", "Process"),
    ] {
        let (status, _) = app
            .post("/api/monitoring/record", reading(location, kind, 22.0))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, environmental) = app.get("/api/monitoring/environmental").await;
    assert_eq!(environmental.as_array().unwrap().len(), 2);

    let (_, room_b) = app
        .get("/api/monitoring/environmental?location=Clean%20Room%20B")
        .await;
    let room_b = room_b.as_array().unwrap();
    assert_eq!(room_b.len(), 1);
    assert_eq!(room_b[0]["location"], "Clean Room B");
    assert_eq!(room_b[0]["alert_level"], "None");
    assert_eq!(room_b[0]["recorded_by"], 1);

    let (_, blank) = app.get("/api/monitoring/environmental?location=").await;
    assert_eq!(blank.as_array().unwrap().len(), 2);

    let (_, process) = app.get("/api/monitoring/process").await;
    let process = process.as_array().unwrap();
    assert_eq!(process.len(), 1);
    assert_eq!(process[0]["parameter_type"], "Process");
}

#[tokio::test]
async fn test_generate_report_defaults_and_generator_name() {
    let app = TestApp::spawn().await;
    let author = insert_user(app.db(), "swilson", "Sarah Wilson").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reports/generate",
            Some(json!({"report_type": "Quality", "title": "Q2 quality review"})),
            Some(&author.to_string()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Report generated successfully");

    let (status, body) = app
        .post(
            "/api/reports/generate",
            json!({
                "report_type": "Audit",
                "title": "Supplier audit",
                "parameters": {"supplier": "ACME"},
                "file_format": "Excel"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, list) = app.get("/api/reports").await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);

    let quality = list.iter().find(|r| r["report_type"] == "Quality").unwrap();
    assert_eq!(quality["parameters"], "{}");
    assert_eq!(quality["file_format"], "PDF");
    assert_eq!(quality["file_path"], serde_json::Value::Null);
    assert_eq!(quality["generated_by_name"], "Sarah Wilson");

    let audit = list.iter().find(|r| r["report_type"] == "Audit").unwrap();
    assert_eq!(audit["parameters"], r#"{"supplier":"ACME"}"#);
    assert_eq!(audit["file_format"], "Excel");
    assert_eq!(audit["generated_by_name"], "QMS Administrator");
}
