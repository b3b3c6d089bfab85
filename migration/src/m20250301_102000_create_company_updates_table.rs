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
                    .table(CompanyUpdates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CompanyUpdates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CompanyUpdates::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(CompanyUpdates::Title).string().not_null())
                    .col(ColumnDef::new(CompanyUpdates::Description).text().not_null())
                    .col(
                        ColumnDef::new(CompanyUpdates::Date)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-company_updates-company_id")
                            .from(CompanyUpdates::Table, CompanyUpdates::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyUpdates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CompanyUpdates {
    Table,
    Id,
    CompanyId,
    Title,
    Description,
    Date,
}
