//! Portfolio-level aggregates over stored companies.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::company;

/// Suggested stages offered by the company form. Other labels are accepted.
pub const STAGES: &[&str] = &[
    "Pre-Seed",
    "Seed",
    "Series A",
    "Series B",
    "Series C",
    "Series D+",
    "Growth",
];

/// Suggested market segments offered by the company form. Other labels are accepted.
pub const MARKET_SEGMENTS: &[&str] = &[
    "AI/ML",
    "SaaS",
    "Fintech",
    "Healthcare",
    "E-commerce",
    "Enterprise",
    "Consumer",
    "Hardware",
    "Blockchain",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub company_count: usize,
    pub total_funding: f64,
    pub total_revenue: f64,
    /// Mean over companies with a known growth rate; absent when none is known
    pub average_revenue_growth: Option<f64>,
    pub by_segment: Vec<Breakdown>,
    pub by_stage: Vec<Breakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub label: String,
    pub company_count: usize,
    pub total_funding: f64,
    pub total_revenue: f64,
}

pub fn summarize(companies: &[company::Model]) -> PortfolioSummary {
    let growth: Vec<f64> = companies.iter().filter_map(|c| c.revenue_growth).collect();
    let average_revenue_growth = if growth.is_empty() {
        None
    } else {
        Some(growth.iter().sum::<f64>() / growth.len() as f64)
    };

    PortfolioSummary {
        company_count: companies.len(),
        total_funding: companies.iter().map(|c| c.total_funding).sum(),
        total_revenue: companies.iter().map(|c| c.current_revenue).sum(),
        average_revenue_growth,
        by_segment: breakdown(companies, |c| &c.market_segment),
        by_stage: breakdown(companies, |c| &c.stage),
    }
}

/// Groups by label; largest funding first, ties by label.
fn breakdown<F>(companies: &[company::Model], label_of: F) -> Vec<Breakdown>
where
    F: Fn(&company::Model) -> &String,
{
    let mut groups: HashMap<&str, Breakdown> = HashMap::new();
    for company in companies {
        let label = label_of(company);
        let entry = groups.entry(label.as_str()).or_insert_with(|| Breakdown {
            label: label.clone(),
            company_count: 0,
            total_funding: 0.0,
            total_revenue: 0.0,
        });
        entry.company_count += 1;
        entry.total_funding += company.total_funding;
        entry.total_revenue += company.current_revenue;
    }

    let mut rows: Vec<Breakdown> = groups.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_funding
            .total_cmp(&a.total_funding)
            .then_with(|| a.label.cmp(&b.label))
    });
    rows
}
