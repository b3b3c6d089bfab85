use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{non_empty, ActionResult, ApiJson};
use crate::analysis::{self, EXAMPLE_QUESTIONS};
use crate::entities::ai_analysis;
use crate::error::AppError;
use crate::store;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Question about a company or the portfolio
    #[serde(default)]
    pub query: Option<String>,
    /// Company the question is about (free text)
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub query: String,
    pub response: String,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ai_analysis::Model> for AnalysisResponse {
    fn from(model: ai_analysis::Model) -> Self {
        AnalysisResponse {
            id: model.id,
            query: model.query,
            response: model.response,
            company_name: model.company_name,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExampleQuestionsResponse {
    pub questions: Vec<String>,
}

/// Ask the (placeholder) AI assistant a question
#[utoipa::path(
    post,
    path = "/analysis",
    request_body = AnalysisRequest,
    responses(
        (status = 201, description = "Analysis produced and saved", body = ActionResult<AnalysisResponse>),
        (status = 400, description = "Empty query")
    ),
    description = "Returns a fixed canned analysis; no model is consulted."
)]
#[tracing::instrument(skip(state, request))]
pub async fn analyze_query(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalysisRequest>,
) -> Result<(StatusCode, Json<ActionResult<AnalysisResponse>>), AppError> {
    let Some(query) = non_empty(request.query.as_deref()) else {
        return Err(AppError::InvalidRequest(
            "Missing required fields for AI analysis".to_string(),
        ));
    };
    let company_name = non_empty(request.company_name.as_deref());

    let saved = analysis::analyze(&state.db, &query, company_name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(ActionResult::ok(saved.into()))))
}

/// Previously asked questions and their answers, newest first
#[utoipa::path(
    get,
    path = "/analysis",
    responses(
        (status = 200, description = "Saved analyses", body = ActionResult<Vec<AnalysisResponse>>)
    )
)]
pub async fn list_analyses(
    State(state): State<AppState>,
) -> Result<Json<ActionResult<Vec<AnalysisResponse>>>, AppError> {
    let saved = store::list_ai_analyses(&state.db).await?;
    Ok(Json(ActionResult::ok(saved.into_iter().map(Into::into).collect())))
}

/// Example questions to prompt the user with
#[utoipa::path(
    get,
    path = "/analysis/examples",
    responses(
        (status = 200, description = "Example questions", body = ActionResult<ExampleQuestionsResponse>)
    )
)]
pub async fn example_questions() -> Json<ActionResult<ExampleQuestionsResponse>> {
    Json(ActionResult::ok(ExampleQuestionsResponse {
        questions: EXAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    }))
}
