use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Companies::TotalFunding)
                            .double()
                            .not_null()
                            .check(Expr::col(Companies::TotalFunding).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Companies::CurrentRevenue)
                            .double()
                            .not_null()
                            .check(Expr::col(Companies::CurrentRevenue).gte(0)),
                    )
                    .col(ColumnDef::new(Companies::InvestorList).json().not_null()) // ordered array of names
                    .col(ColumnDef::new(Companies::MarketSegment).string().not_null())
                    .col(ColumnDef::new(Companies::Stage).string().not_null())
                    .col(ColumnDef::new(Companies::RevenueGrowth).double().null())
                    .col(ColumnDef::new(Companies::Location).string().null())
                    .col(ColumnDef::new(Companies::Website).string().null())
                    .col(ColumnDef::new(Companies::Description).text().null())
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Default listing order is newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx-companies-created_at")
                    .table(Companies::Table)
                    .col(Companies::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Companies {
    Table,
    Id,
    Name,
    TotalFunding,
    CurrentRevenue,
    InvestorList,
    MarketSegment,
    Stage,
    RevenueGrowth,
    Location,
    Website,
    Description,
    CreatedAt,
    UpdatedAt,
}
