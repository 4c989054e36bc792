use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Batches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Batches::BatchNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Batches::ProductName).string_len(255).not_null())
                    .col(ColumnDef::new(Batches::ProductCode).string_len(50))
                    .col(ColumnDef::new(Batches::Quantity).integer().not_null())
                    .col(ColumnDef::new(Batches::Unit).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Batches::Status)
                            .string_len(50)
                            .not_null()
                            .default("In Progress"),
                    )
                    .col(ColumnDef::new(Batches::StartDate).date().not_null())
                    .col(ColumnDef::new(Batches::CompletionDate).date())
                    .col(ColumnDef::new(Batches::ReleaseDate).date())
                    .col(ColumnDef::new(Batches::ExpiryDate).date())
                    .col(
                        ColumnDef::new(Batches::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Batches::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
    BatchNumber,
    ProductName,
    ProductCode,
    Quantity,
    Unit,
    Status,
    StartDate,
    CompletionDate,
    ReleaseDate,
    ExpiryDate,
    CreatedAt,
    UpdatedAt,
}
