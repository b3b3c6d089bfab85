// Route modules, one per resource
pub mod analysis;
pub mod analytics;
pub mod companies;
pub mod import;
pub mod reports;

pub use analysis::*;
pub use analytics::*;
pub use companies::*;
pub use import::*;
pub use reports::*;

use axum::extract::FromRequest;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{company, company_update, metric};
use crate::error::AppError;

/// Tagged result wrapping every successful response. Failures carry `success: false` and an
/// `error` message instead (see `AppError`).
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResult<T> {
    /// Always true here
    pub success: bool,
    pub data: T,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        ActionResult { success: true, data }
    }
}

/// JSON request body whose rejections (syntax, missing fields, wrong content type) come back
/// as a tagged `AppError` instead of axum's plain-text response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    /// Total funding raised, in USD
    pub total_funding: f64,
    /// Annual recurring revenue, in USD
    pub current_revenue: f64,
    /// Investor names in the order they were entered
    pub investor_list: Vec<String>,
    pub market_segment: String,
    pub stage: String,
    /// Year-over-year growth in percent; absent when unknown
    pub revenue_growth: Option<f64>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<company::Model> for CompanyResponse {
    fn from(model: company::Model) -> Self {
        CompanyResponse {
            id: model.id,
            name: model.name,
            total_funding: model.total_funding,
            current_revenue: model.current_revenue,
            investor_list: model.investor_list.0,
            market_segment: model.market_segment,
            stage: model.stage,
            revenue_growth: model.revenue_growth,
            location: model.location,
            website: model.website,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdateResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl From<company_update::Model> for CompanyUpdateResponse {
    fn from(model: company_update::Model) -> Self {
        CompanyUpdateResponse {
            id: model.id,
            company_id: model.company_id,
            title: model.title,
            description: model.description,
            date: model.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    pub date: DateTime<Utc>,
    pub revenue: f64,
    pub growth: f64,
}

impl From<metric::Model> for MetricResponse {
    fn from(model: metric::Model) -> Self {
        MetricResponse {
            id: model.id,
            company_id: model.company_id,
            date: model.date,
            revenue: model.revenue,
            growth: model.growth,
        }
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidRequest(format!("'{}' is not a valid id", raw)))
}

/// Trimmed, non-empty text, or `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
