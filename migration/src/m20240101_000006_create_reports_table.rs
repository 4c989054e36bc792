use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::ReportType).string_len(100).not_null())
                    .col(ColumnDef::new(Reports::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Reports::Description).text())
                    .col(ColumnDef::new(Reports::Parameters).text())
                    .col(ColumnDef::new(Reports::FilePath).string_len(500))
                    .col(ColumnDef::new(Reports::FileFormat).string_len(20))
                    .col(
                        ColumnDef::new(Reports::GeneratedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Reports::GeneratedBy).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_generated_by")
                            .from(Reports::Table, Reports::GeneratedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    ReportType,
    Title,
    Description,
    Parameters,
    FilePath,
    FileFormat,
    GeneratedAt,
    GeneratedBy,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
