use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Documents::DocumentNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Documents::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Documents::DocumentType)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Documents::Version).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Documents::Status)
                            .string_len(50)
                            .not_null()
                            .default("Draft"),
                    )
                    .col(ColumnDef::new(Documents::EffectiveDate).date())
                    .col(ColumnDef::new(Documents::ReviewDate).date())
                    .col(ColumnDef::new(Documents::FilePath).string_len(500))
                    .col(
                        ColumnDef::new(Documents::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Documents::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Documents::CreatedBy).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_created_by")
                            .from(Documents::Table, Documents::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    DocumentNumber,
    Title,
    DocumentType,
    Version,
    Status,
    EffectiveDate,
    ReviewDate,
    FilePath,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
