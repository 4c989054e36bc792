use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 插入默认操作人（id = 1），未携带身份的请求都归属于该用户
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Users::Table)
                    .columns([
                        Users::Id,
                        Users::Username,
                        Users::Email,
                        Users::FullName,
                        Users::Role,
                        Users::Department,
                    ])
                    .values_panic([
                        1.into(),
                        "qa.admin".into(),
                        "qa.admin@qms.local".into(),
                        "QMS Administrator".into(),
                        "QA Manager".into(),
                        "Quality Assurance".into(),
                    ])
                    .on_conflict(OnConflict::column(Users::Id).do_nothing().to_owned())
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Users::Table)
                    .and_where(Expr::col(Users::Username).eq("qa.admin"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    FullName,
    Role,
    Department,
}
