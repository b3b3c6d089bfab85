use sea_orm_migration::prelude::*;

use super::m20250301_101500_create_companies_table::Companies;

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
                    .col(ColumnDef::new(Reports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reports::Title).string().not_null())
                    .col(ColumnDef::new(Reports::Content).text().not_null())
                    .col(ColumnDef::new(Reports::ReportType).string().not_null())
                    .col(ColumnDef::new(Reports::Format).string().not_null())
                    .col(ColumnDef::new(Reports::CompanyId).uuid().null())
                    .col(
                        ColumnDef::new(Reports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Reports outlive the company they describe.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reports-company_id")
                            .from(Reports::Table, Reports::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
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
    Title,
    Content,
    ReportType,
    Format,
    CompanyId,
    CreatedAt,
}
