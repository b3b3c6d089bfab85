use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{non_empty, parse_id, ActionResult, ApiJson};
use crate::entities::report;
use crate::error::AppError;
use crate::store::{self, NewReport};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// Rendered report body
    #[serde(default)]
    pub content: Option<String>,
    /// Kind of report, e.g. "Portfolio Overview" or "Growth Metrics"
    #[serde(default, rename = "type")]
    pub report_type: Option<String>,
    /// Output format, e.g. "pdf", "excel" or "presentation"
    #[serde(default)]
    pub format: Option<String>,
    /// Company the report is about, if any
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub format: String,
    /// Cleared when the company is deleted
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<report::Model> for ReportResponse {
    fn from(model: report::Model) -> Self {
        ReportResponse {
            id: model.id,
            title: model.title,
            content: model.content,
            report_type: model.report_type,
            format: model.format,
            company_id: model.company_id,
            created_at: model.created_at,
        }
    }
}

/// List saved reports, newest first
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "Saved reports", body = ActionResult<Vec<ReportResponse>>)
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<ActionResult<Vec<ReportResponse>>>, AppError> {
    let reports = store::list_reports(&state.db).await?;
    Ok(Json(ActionResult::ok(reports.into_iter().map(Into::into).collect())))
}

/// Save a report
#[utoipa::path(
    post,
    path = "/reports",
    request_body = ReportRequest,
    responses(
        (status = 201, description = "Report saved", body = ActionResult<ReportResponse>),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Referenced company does not exist")
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn create_report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<(StatusCode, Json<ActionResult<ReportResponse>>), AppError> {
    let (Some(title), Some(content), Some(report_type), Some(format)) = (
        non_empty(request.title.as_deref()),
        non_empty(request.content.as_deref()),
        non_empty(request.report_type.as_deref()),
        non_empty(request.format.as_deref()),
    ) else {
        return Err(AppError::InvalidRequest(
            "Missing required fields for report".to_string(),
        ));
    };

    let company_id = match non_empty(request.company_id.as_deref()) {
        Some(raw) => Some(parse_id(&raw)?),
        None => None,
    };

    let report = store::create_report(
        &state.db,
        NewReport {
            title,
            content,
            report_type,
            format,
            company_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(report.into()))))
}
