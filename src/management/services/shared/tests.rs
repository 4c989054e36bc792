use super::{month_bucket, non_empty, trend_cutoff};
use chrono::NaiveDate;
use sea_orm::DatabaseBackend;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn trend_cutoff_goes_back_six_months() {
    assert_eq!(trend_cutoff(date(2024, 10, 15)), date(2024, 4, 15));
    assert_eq!(trend_cutoff(date(2024, 3, 1)), date(2023, 9, 1));
}

#[test]
fn trend_cutoff_clamps_month_end() {
    assert_eq!(trend_cutoff(date(2024, 8, 31)), date(2024, 2, 29));
}

#[test]
fn month_bucket_per_backend() {
    assert_eq!(
        month_bucket(DatabaseBackend::Sqlite, "detected_date"),
        "strftime('%Y-%m', detected_date)"
    );
    assert_eq!(
        month_bucket(DatabaseBackend::Postgres, "target_date"),
        "to_char(target_date, 'YYYY-MM')"
    );
}

#[test]
fn blank_filters_are_ignored() {
    assert_eq!(non_empty(None), None);
    assert_eq!(non_empty(Some("")), None);
    assert_eq!(non_empty(Some("   ")), None);
    assert_eq!(non_empty(Some(" Equipment ")), Some("Equipment"));
}
