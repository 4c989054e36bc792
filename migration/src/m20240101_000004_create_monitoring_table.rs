use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Monitoring::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Monitoring::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Monitoring::Location).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Monitoring::ParameterType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Monitoring::ParameterName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Monitoring::Value).double().not_null())
                    .col(ColumnDef::new(Monitoring::Unit).string_len(20))
                    .col(ColumnDef::new(Monitoring::MinLimit).double())
                    .col(ColumnDef::new(Monitoring::MaxLimit).double())
                    .col(ColumnDef::new(Monitoring::Status).string_len(50).not_null())
                    .col(ColumnDef::new(Monitoring::AlertLevel).string_len(50))
                    .col(
                        ColumnDef::new(Monitoring::RecordedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Monitoring::RecordedBy).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monitoring_recorded_by")
                            .from(Monitoring::Table, Monitoring::RecordedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monitoring_type_recorded_at")
                    .table(Monitoring::Table)
                    .col(Monitoring::ParameterType)
                    .col(Monitoring::RecordedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Monitoring::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Monitoring {
    Table,
    Id,
    Location,
    ParameterType,
    ParameterName,
    Value,
    Unit,
    MinLimit,
    MaxLimit,
    Status,
    AlertLevel,
    RecordedAt,
    RecordedBy,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
