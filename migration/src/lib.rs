pub use sea_orm_migration::prelude::*;

mod m20250301_101500_create_companies_table;
mod m20250301_102000_create_company_updates_table;
mod m20250301_102500_create_metrics_table;
mod m20250301_103000_create_reports_table;
mod m20250301_103500_create_ai_analyses_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_101500_create_companies_table::Migration),
            Box::new(m20250301_102000_create_company_updates_table::Migration),
            Box::new(m20250301_102500_create_metrics_table::Migration),
            Box::new(m20250301_103000_create_reports_table::Migration),
            Box::new(m20250301_103500_create_ai_analyses_table::Migration),
        ]
    }
}
