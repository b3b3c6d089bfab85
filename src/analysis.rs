//! Placeholder AI analysis. Answers every question with the same canned text and keeps a record
//! of what was asked.

use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::entities::ai_analysis;
use crate::error::StoreError;
use crate::store::{self, NewAnalysis};

pub const CANNED_ANALYSIS: &str = "Based on the company's current trajectory and market conditions, here's my analysis:\n\n\
• Strong revenue growth at 45% YoY\n\
• Positive market sentiment\n\
• Expanding market opportunity\n\n\
Recommendation: Consider increasing investment position.";

/// Example questions shown next to the query box.
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "Should we invest more in [Company Name]?",
    "What's the market saying about [Company Name]?",
    "Compare the growth potential of [Company A] and [Company B]",
    "What are the key risks for [Company Name]?",
];

#[tracing::instrument(skip(db))]
pub async fn analyze(
    db: &DatabaseConnection,
    query: &str,
    company_name: Option<&str>,
) -> Result<ai_analysis::Model, StoreError> {
    let analysis = NewAnalysis {
        query: query.to_string(),
        response: CANNED_ANALYSIS.to_string(),
        company_name: company_name.map(str::to_string),
        metadata: Some(json!({ "generator": "canned" })),
    };
    store::save_ai_analysis(db, analysis).await
}
