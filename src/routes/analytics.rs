use axum::{extract::State, Json};

use super::ActionResult;
use crate::analytics::{summarize, PortfolioSummary};
use crate::error::AppError;
use crate::store;
use crate::AppState;

/// Aggregate funding, revenue and growth across the portfolio
#[utoipa::path(
    get,
    path = "/analytics/portfolio",
    responses(
        (status = 200, description = "Portfolio aggregates with per-segment and per-stage breakdowns", body = ActionResult<PortfolioSummary>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn portfolio_analytics(
    State(state): State<AppState>,
) -> Result<Json<ActionResult<PortfolioSummary>>, AppError> {
    let companies = store::list_companies(&state.db).await?;
    Ok(Json(ActionResult::ok(summarize(&companies))))
}
