use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    non_empty, parse_id, ActionResult, ApiJson, CompanyResponse, CompanyUpdateResponse,
    MetricResponse,
};
use crate::analytics::{MARKET_SEGMENTS, STAGES};
use crate::error::AppError;
use crate::import::{normalize, validate_record, NewCompany, RawCompanyRecord};
use crate::store::{self, NewCompanyUpdate, NewMetric};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailResponse {
    #[serde(flatten)]
    pub company: CompanyResponse,
    /// Newest first
    pub updates: Vec<CompanyUpdateResponse>,
    /// Chronological, for charting
    pub metrics: Vec<MetricResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    /// Id of the removed company
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOptionsResponse {
    /// Suggested stages; other labels are accepted
    pub stages: Vec<String>,
    /// Suggested market segments; other labels are accepted
    pub market_segments: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompanyUpdateRequest {
    /// Short headline for the update
    #[serde(default)]
    pub title: Option<String>,
    /// Body of the update
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetricRequest {
    /// Point in time the figures refer to (default: now)
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Revenue for the period, in USD
    pub revenue: f64,
    /// Growth for the period, in percent
    pub growth: f64,
}

/// Runs the form through the same rules as an import row, reporting every violation.
fn validate_form(form: &RawCompanyRecord) -> Result<NewCompany, AppError> {
    validate_record(&normalize(form)).map_err(AppError::Validation)
}

/// List all portfolio companies, newest first
#[utoipa::path(
    get,
    path = "/companies",
    responses(
        (status = 200, description = "Companies in the portfolio", body = ActionResult<Vec<CompanyResponse>>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<ActionResult<Vec<CompanyResponse>>>, AppError> {
    let companies = store::list_companies(&state.db).await?;
    Ok(Json(ActionResult::ok(
        companies.into_iter().map(CompanyResponse::from).collect(),
    )))
}

/// Create a single company from form input
#[utoipa::path(
    post,
    path = "/companies",
    request_body = RawCompanyRecord,
    responses(
        (status = 201, description = "Company created", body = ActionResult<CompanyResponse>),
        (status = 422, description = "One or more fields are invalid; every violation is listed in fieldErrors")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn create_company(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RawCompanyRecord>,
) -> Result<(StatusCode, Json<ActionResult<CompanyResponse>>), AppError> {
    let new = validate_form(&form)?;
    let created = store::create_company(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(created.into()))))
}

/// Suggested stage and market segment labels for company forms
#[utoipa::path(
    get,
    path = "/companies/options",
    responses(
        (status = 200, description = "Suggested labels", body = ActionResult<CompanyOptionsResponse>)
    )
)]
pub async fn company_options() -> Json<ActionResult<CompanyOptionsResponse>> {
    Json(ActionResult::ok(CompanyOptionsResponse {
        stages: STAGES.iter().map(|s| s.to_string()).collect(),
        market_segments: MARKET_SEGMENTS.iter().map(|s| s.to_string()).collect(),
    }))
}

/// Get one company with its updates and metrics
#[utoipa::path(
    get,
    path = "/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company found", body = ActionResult<CompanyDetailResponse>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No company with this id")
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<CompanyDetailResponse>>, AppError> {
    let detail = store::get_company(&state.db, parse_id(&id)?).await?;
    Ok(Json(ActionResult::ok(CompanyDetailResponse {
        company: detail.company.into(),
        updates: detail.updates.into_iter().map(Into::into).collect(),
        metrics: detail.metrics.into_iter().map(Into::into).collect(),
    })))
}

/// Replace every editable field of a company
#[utoipa::path(
    put,
    path = "/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    request_body = RawCompanyRecord,
    responses(
        (status = 200, description = "Company updated", body = ActionResult<CompanyResponse>),
        (status = 404, description = "No company with this id"),
        (status = 422, description = "One or more fields are invalid")
    )
)]
#[tracing::instrument(skip(state, form))]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(form): ApiJson<RawCompanyRecord>,
) -> Result<Json<ActionResult<CompanyResponse>>, AppError> {
    let id = parse_id(&id)?;
    let new = validate_form(&form)?;
    let updated = store::update_company(&state.db, id, new).await?;
    Ok(Json(ActionResult::ok(updated.into())))
}

/// Delete a company together with its updates and metrics
#[utoipa::path(
    delete,
    path = "/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company deleted", body = ActionResult<DeletedResponse>),
        (status = 404, description = "No company with this id")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<DeletedResponse>>, AppError> {
    let uuid = parse_id(&id)?;
    store::delete_company(&state.db, uuid).await?;
    Ok(Json(ActionResult::ok(DeletedResponse { id: uuid.to_string() })))
}

/// Append an update to a company's timeline
#[utoipa::path(
    post,
    path = "/companies/{id}/updates",
    params(("id" = String, Path, description = "Company id")),
    request_body = CompanyUpdateRequest,
    responses(
        (status = 201, description = "Update recorded", body = ActionResult<CompanyUpdateResponse>),
        (status = 400, description = "Missing title or description"),
        (status = 404, description = "No company with this id")
    )
)]
pub async fn add_company_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CompanyUpdateRequest>,
) -> Result<(StatusCode, Json<ActionResult<CompanyUpdateResponse>>), AppError> {
    let company_id = parse_id(&id)?;
    let (Some(title), Some(description)) = (
        non_empty(request.title.as_deref()),
        non_empty(request.description.as_deref()),
    ) else {
        return Err(AppError::InvalidRequest(
            "Missing required fields for company update".to_string(),
        ));
    };

    let update = store::create_company_update(
        &state.db,
        company_id,
        NewCompanyUpdate { title, description },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(update.into()))))
}

/// Record a revenue/growth data point for a company
#[utoipa::path(
    post,
    path = "/companies/{id}/metrics",
    params(("id" = String, Path, description = "Company id")),
    request_body = MetricRequest,
    responses(
        (status = 201, description = "Metric recorded", body = ActionResult<MetricResponse>),
        (status = 400, description = "Revenue negative or values not finite"),
        (status = 404, description = "No company with this id")
    )
)]
pub async fn add_metric(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<MetricRequest>,
) -> Result<(StatusCode, Json<ActionResult<MetricResponse>>), AppError> {
    let company_id = parse_id(&id)?;
    if !request.revenue.is_finite() || request.revenue < 0.0 || !request.growth.is_finite() {
        return Err(AppError::InvalidRequest(
            "Metric revenue must be a non-negative number and growth a finite number".to_string(),
        ));
    }

    let metric = store::record_metric(
        &state.db,
        company_id,
        NewMetric {
            date: request.date.unwrap_or_else(Utc::now),
            revenue: request.revenue,
            growth: request.growth,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(metric.into()))))
}
