//! Pure per-field cleanup applied before validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use super::parser::RawRow;

/// Exact CSV header labels.
pub const COMPANY_NAME: &str = "Company Name";
pub const TOTAL_FUNDING: &str = "Total Funding";
pub const CURRENT_REVENUE: &str = "Current Revenue";
pub const INVESTOR_LIST: &str = "Investor List";
pub const MARKET_SEGMENT: &str = "Market Segment";
pub const STAGE: &str = "Stage";

// Anything that is not a digit or a decimal point: currency symbols, thousands separators, words.
static NON_AMOUNT_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").expect("static regex"));

/// Company fields as submitted, before any cleanup. Every field is free text.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCompanyRecord {
    pub name: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    #[schema(value_type = Option<String>)]
    pub total_funding: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    #[schema(value_type = Option<String>)]
    pub current_revenue: Option<String>,
    /// Comma-separated investor names
    pub investor_list: Option<String>,
    pub market_segment: Option<String>,
    pub stage: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    #[schema(value_type = Option<String>)]
    pub revenue_growth: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

/// Form clients send amounts either as typed text or as JSON numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    }))
}

impl From<&RawRow> for RawCompanyRecord {
    fn from(row: &RawRow) -> Self {
        let take = |label: &str| row.get(label).map(str::to_string);
        RawCompanyRecord {
            name: take(COMPANY_NAME),
            total_funding: take(TOTAL_FUNDING),
            current_revenue: take(CURRENT_REVENUE),
            investor_list: take(INVESTOR_LIST),
            market_segment: take(MARKET_SEGMENT),
            stage: take(STAGE),
            ..Default::default()
        }
    }
}

/// Cleaned record. Amounts are still text here: deciding whether they parse is the validator's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    pub name: String,
    pub total_funding: String,
    pub current_revenue: String,
    pub investor_list: Vec<String>,
    pub market_segment: String,
    pub stage: String,
    pub revenue_growth: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

pub fn normalize(raw: &RawCompanyRecord) -> NormalizedRecord {
    NormalizedRecord {
        name: trimmed(&raw.name),
        total_funding: strip_amount(raw.total_funding.as_deref().unwrap_or_default()),
        current_revenue: strip_amount(raw.current_revenue.as_deref().unwrap_or_default()),
        investor_list: split_investors(raw.investor_list.as_deref()),
        market_segment: trimmed(&raw.market_segment),
        stage: trimmed(&raw.stage),
        revenue_growth: optional(&raw.revenue_growth)
            .map(|g| g.replace('%', "").trim().to_string())
            .filter(|g| !g.is_empty()),
        location: optional(&raw.location),
        website: optional(&raw.website),
        description: optional(&raw.description),
    }
}

pub fn normalize_row(row: &RawRow) -> NormalizedRecord {
    normalize(&RawCompanyRecord::from(row))
}

/// Drops every character that is not a digit or a decimal point, sign included.
pub fn strip_amount(value: &str) -> String {
    NON_AMOUNT_CHARS.replace_all(value, "").into_owned()
}

/// Splits on commas, trims each name and drops empty ones. Order and duplicates are kept.
pub fn split_investors(value: Option<&str>) -> Vec<String> {
    value
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
