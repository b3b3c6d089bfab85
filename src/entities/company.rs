use std::fmt;

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub total_funding: f64,
    pub current_revenue: f64,
    #[sea_orm(column_type = "Json")]
    pub investor_list: InvestorList, // Stored as a JSON array, input order kept
    pub market_segment: String,
    pub stage: String,
    pub revenue_growth: Option<f64>, // None means unknown, not zero
    pub location: Option<String>,
    pub website: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_update::Entity")]
    Updates,
    #[sea_orm(has_many = "super::metric::Entity")]
    Metrics,
    #[sea_orm(has_many = "super::report::Entity")]
    Reports,
}

impl Related<super::company_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updates.def()
    }
}

impl Related<super::metric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Metrics.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Ordered investor names. Duplicates are kept as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct InvestorList(pub Vec<String>);

impl InvestorList {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for InvestorList {
    fn from(names: Vec<String>) -> Self {
        InvestorList(names)
    }
}

/// Joins the names back into the comma-separated form used by CSV and forms.
impl fmt::Display for InvestorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
