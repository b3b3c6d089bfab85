//! Persistence operations over the portfolio tables.

use chrono::{DateTime, Utc};
use sea_orm::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, IntoActiveModel, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{ai_analysis, company, company_update, metric, report};
use crate::entities::{AiAnalysis, Company, CompanyUpdate, Metric, Report};
use crate::error::StoreError;
use crate::import::NewCompany;

/// A company together with its child records.
#[derive(Debug, Clone)]
pub struct CompanyDetail {
    pub company: company::Model,
    /// Newest first
    pub updates: Vec<company_update::Model>,
    /// Oldest first, ready for charting
    pub metrics: Vec<metric::Model>,
}

#[derive(Debug, Clone)]
pub struct NewCompanyUpdate {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewMetric {
    pub date: DateTime<Utc>,
    pub revenue: f64,
    pub growth: f64,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub content: String,
    pub report_type: String,
    pub format: String,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub query: String,
    pub response: String,
    pub company_name: Option<String>,
    pub metadata: Option<Json>,
}

/// Newest companies first.
pub async fn list_companies(db: &DatabaseConnection) -> Result<Vec<company::Model>, StoreError> {
    let companies = Company::find()
        .order_by_desc(company::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(companies)
}

pub async fn get_company(db: &DatabaseConnection, id: Uuid) -> Result<CompanyDetail, StoreError> {
    let company = find_company(db, id).await?;

    let updates = company
        .find_related(CompanyUpdate)
        .order_by_desc(company_update::Column::Date)
        .all(db)
        .await?;
    let metrics = company
        .find_related(Metric)
        .order_by_asc(metric::Column::Date)
        .all(db)
        .await?;

    Ok(CompanyDetail {
        company,
        updates,
        metrics,
    })
}

/// Inserts one company on any connection, including an open transaction.
pub async fn insert_company<C>(db: &C, new: NewCompany) -> Result<company::Model, DbErr>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let am = company::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        total_funding: Set(new.total_funding),
        current_revenue: Set(new.current_revenue),
        investor_list: Set(new.investor_list.into()),
        market_segment: Set(new.market_segment),
        stage: Set(new.stage),
        revenue_growth: Set(new.revenue_growth),
        location: Set(new.location),
        website: Set(new.website),
        description: Set(new.description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await
}

#[tracing::instrument(skip(db, new), fields(name = %new.name))]
pub async fn create_company(db: &DatabaseConnection, new: NewCompany) -> Result<company::Model, StoreError> {
    let created = insert_company(db, new).await?;
    tracing::info!(id = %created.id, "Created company");
    Ok(created)
}

/// Replaces every mutable field of an existing company.
#[tracing::instrument(skip(db, new), fields(id = %id))]
pub async fn update_company(
    db: &DatabaseConnection,
    id: Uuid,
    new: NewCompany,
) -> Result<company::Model, StoreError> {
    let mut am = find_company(db, id).await?.into_active_model();
    am.name = Set(new.name);
    am.total_funding = Set(new.total_funding);
    am.current_revenue = Set(new.current_revenue);
    am.investor_list = Set(new.investor_list.into());
    am.market_segment = Set(new.market_segment);
    am.stage = Set(new.stage);
    am.revenue_growth = Set(new.revenue_growth);
    am.location = Set(new.location);
    am.website = Set(new.website);
    am.description = Set(new.description);
    am.updated_at = Set(Utc::now());

    Ok(am.update(db).await?)
}

/// Deletes a company with its updates and metrics. Reports about it are kept but detached.
#[tracing::instrument(skip(db), fields(id = %id))]
pub async fn delete_company(db: &DatabaseConnection, id: Uuid) -> Result<(), StoreError> {
    let txn = db.begin().await?;

    if Company::find_by_id(id).one(&txn).await?.is_none() {
        return Err(StoreError::NotFound(format!("Company {}", id)));
    }

    // Children go first; reports outlive the company.
    CompanyUpdate::delete_many()
        .filter(company_update::Column::CompanyId.eq(id))
        .exec(&txn)
        .await?;
    Metric::delete_many()
        .filter(metric::Column::CompanyId.eq(id))
        .exec(&txn)
        .await?;
    Report::update_many()
        .col_expr(report::Column::CompanyId, Expr::value(Option::<Uuid>::None))
        .filter(report::Column::CompanyId.eq(id))
        .exec(&txn)
        .await?;
    Company::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!("Deleted company");
    Ok(())
}

pub async fn create_company_update(
    db: &DatabaseConnection,
    company_id: Uuid,
    new: NewCompanyUpdate,
) -> Result<company_update::Model, StoreError> {
    find_company(db, company_id).await?;

    let am = company_update::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        title: Set(new.title),
        description: Set(new.description),
        date: Set(Utc::now()),
    };
    Ok(am.insert(db).await?)
}

pub async fn record_metric(
    db: &DatabaseConnection,
    company_id: Uuid,
    new: NewMetric,
) -> Result<metric::Model, StoreError> {
    find_company(db, company_id).await?;

    let am = metric::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        date: Set(new.date),
        revenue: Set(new.revenue),
        growth: Set(new.growth),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_reports(db: &DatabaseConnection) -> Result<Vec<report::Model>, StoreError> {
    Ok(Report::find()
        .order_by_desc(report::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn create_report(db: &DatabaseConnection, new: NewReport) -> Result<report::Model, StoreError> {
    if let Some(company_id) = new.company_id {
        find_company(db, company_id).await?;
    }

    let am = report::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(new.title),
        content: Set(new.content),
        report_type: Set(new.report_type),
        format: Set(new.format),
        company_id: Set(new.company_id),
        created_at: Set(Utc::now()),
    };
    Ok(am.insert(db).await?)
}

pub async fn save_ai_analysis(
    db: &DatabaseConnection,
    new: NewAnalysis,
) -> Result<ai_analysis::Model, StoreError> {
    let am = ai_analysis::ActiveModel {
        id: Set(Uuid::new_v4()),
        query: Set(new.query),
        response: Set(new.response),
        company_name: Set(new.company_name),
        metadata: Set(new.metadata),
        created_at: Set(Utc::now()),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_ai_analyses(db: &DatabaseConnection) -> Result<Vec<ai_analysis::Model>, StoreError> {
    Ok(AiAnalysis::find()
        .order_by_desc(ai_analysis::Column::CreatedAt)
        .all(db)
        .await?)
}

async fn find_company(db: &DatabaseConnection, id: Uuid) -> Result<company::Model, StoreError> {
    Company::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Company {}", id)))
}
