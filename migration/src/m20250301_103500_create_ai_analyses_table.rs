use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiAnalyses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AiAnalyses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AiAnalyses::Query).text().not_null())
                    .col(ColumnDef::new(AiAnalyses::Response).text().not_null())
                    .col(ColumnDef::new(AiAnalyses::CompanyName).string().null()) // free text, not a foreign key
                    .col(ColumnDef::new(AiAnalyses::Metadata).json().null())
                    .col(
                        ColumnDef::new(AiAnalyses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiAnalyses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AiAnalyses {
    Table,
    Id,
    Query,
    Response,
    CompanyName,
    Metadata,
    CreatedAt,
}
