use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Capa::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Capa::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Capa::CapaNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    // 与偏差松散关联，不建外键，偏差可被直接删除
                    .col(ColumnDef::new(Capa::DeviationId).integer())
                    .col(ColumnDef::new(Capa::Type).string_len(50).not_null())
                    .col(ColumnDef::new(Capa::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Capa::Description).text().not_null())
                    .col(ColumnDef::new(Capa::RootCause).text())
                    .col(ColumnDef::new(Capa::ActionPlan).text().not_null())
                    .col(
                        ColumnDef::new(Capa::ResponsiblePerson)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Capa::TargetDate).date().not_null())
                    .col(ColumnDef::new(Capa::CompletionDate).date())
                    .col(
                        ColumnDef::new(Capa::Status)
                            .string_len(50)
                            .not_null()
                            .default("Open"),
                    )
                    .col(ColumnDef::new(Capa::Effectiveness).string_len(255))
                    .col(ColumnDef::new(Capa::VerificationDate).date())
                    .col(
                        ColumnDef::new(Capa::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Capa::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Capa::CreatedBy).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_capa_created_by")
                            .from(Capa::Table, Capa::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_capa_deviation_id")
                    .table(Capa::Table)
                    .col(Capa::DeviationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_capa_status_target_date")
                    .table(Capa::Table)
                    .col(Capa::Status)
                    .col(Capa::TargetDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Capa::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Capa {
    Table,
    Id,
    CapaNumber,
    DeviationId,
    Type,
    Title,
    Description,
    RootCause,
    ActionPlan,
    ResponsiblePerson,
    TargetDate,
    CompletionDate,
    Status,
    Effectiveness,
    VerificationDate,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
