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
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Metrics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Metrics::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Metrics::Date).timestamp_with_time_zone().not_null())
                    .col(
                        ColumnDef::new(Metrics::Revenue)
                            .double()
                            .not_null()
                            .check(Expr::col(Metrics::Revenue).gte(0)),
                    )
                    .col(ColumnDef::new(Metrics::Growth).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-metrics-company_id")
                            .from(Metrics::Table, Metrics::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Metrics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Metrics {
    Table,
    Id,
    CompanyId,
    Date,
    Revenue,
    Growth,
}
