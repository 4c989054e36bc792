pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_deviations_table;
mod m20240101_000003_create_capa_table;
mod m20240101_000004_create_monitoring_table;
mod m20240101_000005_create_batches_table;
mod m20240101_000006_create_reports_table;
mod m20240101_000007_create_documents_table;
mod m20240101_000008_create_audit_logs_table;
mod m20240101_000009_insert_default_admin_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_deviations_table::Migration),
            Box::new(m20240101_000003_create_capa_table::Migration),
            Box::new(m20240101_000004_create_monitoring_table::Migration),
            Box::new(m20240101_000005_create_batches_table::Migration),
            Box::new(m20240101_000006_create_reports_table::Migration),
            Box::new(m20240101_000007_create_documents_table::Migration),
            Box::new(m20240101_000008_create_audit_logs_table::Migration),
            Box::new(m20240101_000009_insert_default_admin_user::Migration),
        ]
    }
}
