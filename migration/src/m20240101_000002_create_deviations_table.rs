use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deviations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deviations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Deviations::DeviationNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Deviations::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Deviations::Description).text().not_null())
                    .col(ColumnDef::new(Deviations::Category).string_len(100).not_null())
                    .col(ColumnDef::new(Deviations::Severity).integer().not_null())
                    .col(ColumnDef::new(Deviations::Occurrence).integer().not_null())
                    .col(ColumnDef::new(Deviations::Detection).integer().not_null())
                    .col(ColumnDef::new(Deviations::Rpn).big_integer().not_null())
                    .col(
                        ColumnDef::new(Deviations::Status)
                            .string_len(50)
                            .not_null()
                            .default("Open"),
                    )
                    .col(ColumnDef::new(Deviations::Department).string_len(100))
                    .col(ColumnDef::new(Deviations::ProductBatch).string_len(100))
                    .col(ColumnDef::new(Deviations::DetectedDate).date().not_null())
                    .col(
                        ColumnDef::new(Deviations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Deviations::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Deviations::CreatedBy).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deviations_created_by")
                            .from(Deviations::Table, Deviations::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .name("idx_deviations_status")
                    .table(Deviations::Table)
                    .col(Deviations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deviations_created_at")
                    .table(Deviations::Table)
                    .col(Deviations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deviations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Deviations {
    Table,
    Id,
    DeviationNumber,
    Title,
    Description,
    Category,
    Severity,
    Occurrence,
    Detection,
    Rpn,
    Status,
    Department,
    ProductBatch,
    DetectedDate,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
