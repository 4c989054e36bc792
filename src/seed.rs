//! # 演示数据
//!
//! 为空库填充随机演示数据。每张表只在为空时填充；用户按用户名去重插入。

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use entity::{
    Batches, Capa, CapaStatus, CapaType, DeviationStatus, Deviations, Monitoring, ReadingStatus,
    Reports, Users, batches, capa, deviations, monitoring, reports, users,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::Serialize;

use crate::error::{Context, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};
use crate::rules::{RecordKind, classify_reading, compute_rpn};

/// 每张表插入的行数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: u64,
    pub deviations: u64,
    pub capa: u64,
    pub monitoring: u64,
    pub batches: u64,
    pub reports: u64,
}

impl SeedSummary {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.users + self.deviations + self.capa + self.monitoring + self.batches + self.reports
    }
}

const SAMPLE_USERS: [(&str, &str, &str, &str, &str); 5] = [
    ("jsmith", "john.smith@pharma.com", "John Smith", "QA Manager", "Quality Assurance"),
    ("mjohnson", "mary.johnson@pharma.com", "Mary Johnson", "Production Manager", "Production"),
    ("rdavis", "robert.davis@pharma.com", "Robert Davis", "QC Analyst", "Quality Control"),
    ("swilson", "sarah.wilson@pharma.com", "Sarah Wilson", "Regulatory Affairs", "Regulatory"),
    ("tbrown", "thomas.brown@pharma.com", "Thomas Brown", "Manufacturing Supervisor", "Production"),
];

const DEVIATION_CATEGORIES: [&str; 5] = [
    "Manufacturing",
    "Quality Control",
    "Equipment",
    "Documentation",
    "Material",
];
const DEPARTMENTS: [&str; 4] = ["Production", "QC Lab", "Warehouse", "Packaging"];
const ROOT_CAUSES: [&str; 4] = [
    "Process variation",
    "Human error",
    "Equipment malfunction",
    "Material defect",
];
const RESPONSIBLE: [&str; 3] = ["John Smith", "Mary Johnson", "Robert Davis"];
const LOCATIONS: [&str; 4] = ["Clean Room A", "Clean Room B", "Warehouse", "Production Area"];

/// (参数名, 单位, 下限, 上限)
const ENVIRONMENTAL_PARAMETERS: [(&str, &str, f64, f64); 3] = [
    ("Temperature", "°C", 20.0, 24.0),
    ("Humidity", "%", 40.0, 60.0),
    ("Pressure", "Pa", 10.0, 15.0),
];
const PROCESS_PARAMETERS: [(&str, &str, f64, f64); 3] = [
    ("pH", "", 6.8, 7.2),
    ("Mixing Speed", "RPM", 95.0, 105.0),
    ("Temperature", "°C", 35.0, 40.0),
];

const PRODUCTS: [(&str, &str); 4] = [
    ("Aspirin 500mg Tablets", "ASP-500"),
    ("Ibuprofen 200mg Capsules", "IBU-200"),
    ("Amoxicillin 250mg Suspension", "AMX-250"),
    ("Paracetamol 500mg Tablets", "PAR-500"),
];
const BATCH_STATUSES: [&str; 4] = ["In Progress", "QC Testing", "Released", "Quarantine"];
const REPORT_TYPES: [&str; 6] = [
    "Quality",
    "Deviation",
    "Audit",
    "Production",
    "Laboratory",
    "Training",
];

/// 使用系统熵源填充演示数据
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<SeedSummary> {
    let mut rng = StdRng::from_entropy();
    seed_with_rng(db, &mut rng, chrono::Utc::now().naive_utc()).await
}

/// 使用给定随机源和当前时间填充演示数据（整体一个事务）
pub async fn seed_with_rng(
    db: &DatabaseConnection,
    rng: &mut StdRng,
    now: NaiveDateTime,
) -> Result<SeedSummary> {
    linfo!(
        "system",
        LogStage::Seeding,
        LogComponent::Seed,
        "seed_start",
        "开始填充演示数据"
    );

    let txn = db.begin().await.context("开启事务失败")?;
    let today = now.date();
    let mut summary = SeedSummary {
        users: seed_users(&txn, now).await?,
        ..SeedSummary::default()
    };

    let user_ids: Vec<i32> = Users::find()
        .select_only()
        .column(users::Column::Id)
        .order_by_asc(users::Column::Id)
        .into_tuple::<i32>()
        .all(&txn)
        .await
        .context("查询用户ID失败")?;
    let pick_user = |rng: &mut StdRng| user_ids.choose(rng).copied();

    if Deviations::find().count(&txn).await? == 0 {
        let rows: Vec<deviations::ActiveModel> = (1..=25)
            .map(|i| {
                let created_by = pick_user(rng);
                sample_deviation(rng, i, today, now, created_by)
            })
            .collect::<Result<_>>()?;
        summary.deviations = insert_all(&txn, Deviations::insert_many(rows), 25).await?;
    }

    if Capa::find().count(&txn).await? == 0 {
        let deviation_ids: Vec<i32> = Deviations::find()
            .select_only()
            .column(deviations::Column::Id)
            .order_by_asc(deviations::Column::Id)
            .limit(15)
            .into_tuple::<i32>()
            .all(&txn)
            .await
            .context("查询偏差ID失败")?;
        let rows: Vec<capa::ActiveModel> = (1..=15)
            .map(|i| {
                let deviation_id = deviation_ids.get((i - 1) as usize).copied();
                let created_by = pick_user(rng);
                sample_capa(rng, i, deviation_id, today, now, created_by)
            })
            .collect();
        summary.capa = insert_all(&txn, Capa::insert_many(rows), 15).await?;
    }

    if Monitoring::find().count(&txn).await? == 0 {
        let rows: Vec<monitoring::ActiveModel> = (0..100)
            .map(|_| {
                let recorded_by = pick_user(rng);
                sample_reading(rng, now, recorded_by)
            })
            .collect();
        summary.monitoring = insert_all(&txn, Monitoring::insert_many(rows), 100).await?;
    }

    if Batches::find().count(&txn).await? == 0 {
        let rows: Vec<batches::ActiveModel> =
            (1..=20).map(|i| sample_batch(rng, i, today, now)).collect();
        summary.batches = insert_all(&txn, Batches::insert_many(rows), 20).await?;
    }

    if Reports::find().count(&txn).await? == 0 {
        let rows: Vec<reports::ActiveModel> = (1..=10)
            .map(|i| {
                let generated_by = pick_user(rng);
                sample_report(rng, i, now, generated_by)
            })
            .collect();
        summary.reports = insert_all(&txn, Reports::insert_many(rows), 10).await?;
    }

    txn.commit().await.context("提交演示数据事务失败")?;

    linfo!(
        "system",
        LogStage::Seeding,
        LogComponent::Seed,
        "seed_complete",
        &format!("演示数据填充完成，共插入 {} 行", summary.total()),
        users = summary.users,
        deviations = summary.deviations,
        capa = summary.capa,
        monitoring = summary.monitoring,
        batches = summary.batches,
        reports = summary.reports
    );
    Ok(summary)
}

async fn seed_users<C: ConnectionTrait>(db: &C, now: NaiveDateTime) -> Result<u64> {
    let rows = SAMPLE_USERS
        .iter()
        .map(|(username, email, full_name, role, department)| users::ActiveModel {
            username: Set((*username).to_string()),
            email: Set((*email).to_string()),
            full_name: Set((*full_name).to_string()),
            role: Set((*role).to_string()),
            department: Set(Some((*department).to_string())),
            created_at: Set(now),
            ..Default::default()
        });

    Users::insert_many(rows)
        .on_conflict(
            OnConflict::column(users::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .context("写入演示用户失败")
}

async fn insert_all<A, C>(db: &C, insert: sea_orm::Insert<A>, expected: u64) -> Result<u64>
where
    A: sea_orm::ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let inserted = insert
        .exec_without_returning(db)
        .await
        .with_context(|| format!("写入演示数据失败（预期 {expected} 行）"))?;
    if inserted != expected {
        return Err(crate::database_error!(
            "写入演示数据行数不符: 预期 {} 实际 {}",
            expected,
            inserted
        ));
    }
    Ok(inserted)
}

fn days_ago(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

fn sample_deviation(
    rng: &mut StdRng,
    index: u32,
    today: NaiveDate,
    now: NaiveDateTime,
    created_by: Option<i32>,
) -> Result<deviations::ActiveModel> {
    let category = DEVIATION_CATEGORIES.choose(rng).copied().unwrap_or("Manufacturing");
    let severity = rng.gen_range(1..=10);
    let occurrence = rng.gen_range(1..=10);
    let detection = rng.gen_range(1..=10);
    let statuses = [
        DeviationStatus::Open,
        DeviationStatus::UnderInvestigation,
        DeviationStatus::CapaRequired,
        DeviationStatus::Closed,
    ];

    Ok(deviations::ActiveModel {
        deviation_number: Set(RecordKind::Deviation.format(today.year(), index)),
        title: Set(format!("{category} Deviation - Sample {index}")),
        description: Set(format!(
            "Sample deviation description for {} issue.",
            category.to_lowercase()
        )),
        category: Set(category.to_string()),
        severity: Set(severity),
        occurrence: Set(occurrence),
        detection: Set(detection),
        rpn: Set(compute_rpn(severity, occurrence, detection)?),
        status: Set(statuses.choose(rng).copied().unwrap_or_default()),
        department: Set(DEPARTMENTS.choose(rng).map(ToString::to_string)),
        product_batch: Set(Some(format!("BATCH-{}", rng.gen_range(1000..=9999)))),
        detected_date: Set(days_ago(today, rng.gen_range(1..=90))),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(created_by),
        ..Default::default()
    })
}

fn sample_capa(
    rng: &mut StdRng,
    index: u32,
    deviation_id: Option<i32>,
    today: NaiveDate,
    now: NaiveDateTime,
    created_by: Option<i32>,
) -> capa::ActiveModel {
    let types = [CapaType::Corrective, CapaType::Preventive, CapaType::Both];
    let statuses = [
        CapaStatus::Open,
        CapaStatus::InProgress,
        CapaStatus::PendingVerification,
        CapaStatus::Effective,
        CapaStatus::Closed,
    ];
    let status = statuses.choose(rng).copied().unwrap_or_default();
    let root_cause = ROOT_CAUSES.choose(rng).copied().unwrap_or("Process variation");

    capa::ActiveModel {
        capa_number: Set(RecordKind::Capa.format(today.year(), index)),
        deviation_id: Set(deviation_id),
        capa_type: Set(types.choose(rng).copied().unwrap_or(CapaType::Corrective)),
        title: Set(format!("CAPA for Deviation {index}")),
        description: Set("Sample CAPA description for addressing deviation.".to_string()),
        root_cause: Set(Some(format!("Root cause analysis: {root_cause}"))),
        action_plan: Set(
            "Action plan to address the root cause and prevent recurrence.".to_string(),
        ),
        responsible_person: Set(RESPONSIBLE.choose(rng).copied().unwrap_or("John Smith").to_string()),
        target_date: Set(today + Duration::days(rng.gen_range(30..=90))),
        completion_date: Set((status == CapaStatus::Closed).then_some(today)),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(created_by),
        ..Default::default()
    }
}

fn sample_reading(
    rng: &mut StdRng,
    now: NaiveDateTime,
    recorded_by: Option<i32>,
) -> monitoring::ActiveModel {
    let (parameter_type, parameters) = if rng.gen_bool(0.5) {
        ("Environmental", &ENVIRONMENTAL_PARAMETERS)
    } else {
        ("Process", &PROCESS_PARAMETERS)
    };
    let (name, unit, min, max) = parameters
        .choose(rng)
        .copied()
        .unwrap_or(ENVIRONMENTAL_PARAMETERS[0]);
    let value = (rng.gen_range(min..=max) * 100.0).round() / 100.0;
    let status = classify_reading(value, Some(min), Some(max));

    monitoring::ActiveModel {
        location: Set(LOCATIONS.choose(rng).copied().unwrap_or("Clean Room A").to_string()),
        parameter_type: Set(parameter_type.to_string()),
        parameter_name: Set(name.to_string()),
        value: Set(value),
        unit: Set(Some(unit.to_string())),
        min_limit: Set(Some(min)),
        max_limit: Set(Some(max)),
        status: Set(status),
        alert_level: Set(Some(
            if status == ReadingStatus::OutOfSpec { "High" } else { "None" }.to_string(),
        )),
        recorded_at: Set(now - Duration::minutes(rng.gen_range(0..=7 * 24 * 60))),
        recorded_by: Set(recorded_by),
        ..Default::default()
    }
}

fn sample_batch(
    rng: &mut StdRng,
    index: u32,
    today: NaiveDate,
    now: NaiveDateTime,
) -> batches::ActiveModel {
    let (product_name, product_code) = PRODUCTS.choose(rng).copied().unwrap_or(PRODUCTS[0]);
    let unit = if product_name.contains("Tablets") {
        "tablets"
    } else if product_name.contains("Capsules") {
        "capsules"
    } else {
        "ml"
    };

    batches::ActiveModel {
        batch_number: Set(format!("BATCH-{}{index:04}", today.year())),
        product_name: Set(product_name.to_string()),
        product_code: Set(Some(product_code.to_string())),
        quantity: Set(rng.gen_range(10_000..=100_000)),
        unit: Set(unit.to_string()),
        status: Set(BATCH_STATUSES.choose(rng).copied().unwrap_or("In Progress").to_string()),
        start_date: Set(days_ago(today, rng.gen_range(1..=60))),
        completion_date: Set(None),
        release_date: Set(None),
        expiry_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

fn sample_report(
    rng: &mut StdRng,
    index: u32,
    now: NaiveDateTime,
    generated_by: Option<i32>,
) -> reports::ActiveModel {
    let report_type = REPORT_TYPES.choose(rng).copied().unwrap_or("Quality");
    let generated_at = now - Duration::days(rng.gen_range(1..=30));
    let slug = report_type.to_lowercase();

    reports::ActiveModel {
        report_type: Set(report_type.to_string()),
        title: Set(format!(
            "{report_type} Report - {}",
            generated_at.format("%B %Y")
        )),
        description: Set(Some(format!("Monthly {slug} report"))),
        parameters: Set(Some(r#"{"period": "monthly", "format": "pdf"}"#.to_string())),
        file_path: Set(Some(format!("/reports/{slug}_report_{index}.pdf"))),
        file_format: Set(Some("PDF".to_string())),
        generated_at: Set(generated_at),
        generated_by: Set(generated_by),
        ..Default::default()
    }
}
