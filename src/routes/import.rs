use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::StringRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ActionResult, ApiJson, CompanyResponse};
use crate::entities::company;
use crate::error::AppError;
use crate::import::{self, RawCompanyRecord};
use crate::AppState;

/// Name of the multipart field carrying the CSV file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Number of companies created
    pub imported: usize,
    /// Created companies, in input order
    pub companies: Vec<CompanyResponse>,
}

impl From<Vec<company::Model>> for ImportResponse {
    fn from(created: Vec<company::Model>) -> Self {
        ImportResponse {
            imported: created.len(),
            companies: created.into_iter().map(CompanyResponse::from).collect(),
        }
    }
}

/// Import companies from a CSV document sent as the request body
#[utoipa::path(
    post,
    path = "/import/csv",
    request_body(content = String, content_type = "text/csv", description = "Header row `Company Name,Total Funding,Current Revenue,Investor List,Market Segment,Stage` followed by one row per company"),
    responses(
        (status = 201, description = "Every row imported", body = ActionResult<ImportResponse>),
        (status = 400, description = "Malformed CSV or no rows; nothing imported"),
        (status = 422, description = "A row failed validation; nothing imported"),
        (status = 500, description = "Store failure; the whole batch was rolled back")
    ),
    description = "All-or-nothing: one invalid row rejects the entire file."
)]
#[tracing::instrument(skip(state, body))]
pub async fn import_csv(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<(StatusCode, Json<ActionResult<ImportResponse>>), AppError> {
    let body = body?;
    tracing::debug!(bytes = body.len(), "Received CSV body");
    let created = import::import_csv(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(created.into()))))
}

/// Import companies from an uploaded CSV file (multipart field `file`)
#[utoipa::path(
    post,
    path = "/import/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Every row imported", body = ActionResult<ImportResponse>),
        (status = 400, description = "No file, malformed CSV or no rows; nothing imported"),
        (status = 422, description = "A row failed validation; nothing imported"),
        (status = 500, description = "Store failure; the whole batch was rolled back")
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn import_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ActionResult<ImportResponse>>), AppError> {
    let mut multipart = multipart?;
    let mut csv_text = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            let text = field
                .text()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("Failed to read uploaded file: {}", e)))?;
            tracing::info!(file = ?file_name, bytes = text.len(), "Received CSV upload");
            csv_text = Some(text);
            break;
        }
    }

    let Some(csv_text) = csv_text else {
        return Err(AppError::InvalidRequest(format!(
            "Expected a CSV file in the '{}' field",
            FILE_FIELD
        )));
    };

    let created = import::import_csv(&state.db, &csv_text).await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(created.into()))))
}

/// Import companies that were already split into fields by the client
#[utoipa::path(
    post,
    path = "/import/records",
    request_body = Vec<RawCompanyRecord>,
    responses(
        (status = 201, description = "Every record imported", body = ActionResult<ImportResponse>),
        (status = 400, description = "Empty batch; nothing imported"),
        (status = 422, description = "A record failed validation; nothing imported"),
        (status = 500, description = "Store failure; the whole batch was rolled back")
    )
)]
#[tracing::instrument(skip(state, records), fields(records = records.len()))]
pub async fn import_records(
    State(state): State<AppState>,
    ApiJson(records): ApiJson<Vec<RawCompanyRecord>>,
) -> Result<(StatusCode, Json<ActionResult<ImportResponse>>), AppError> {
    let created = import::import_records(&state.db, &records).await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(created.into()))))
}
