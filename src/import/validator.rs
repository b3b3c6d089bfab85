//! Field rules for company records.
//!
//! One rule set, two reporting modes: a batch stops at the first violation of the first bad
//! record, a single form submission collects every violation so all of them can be shown at once.

use url::Url;

use super::normalizer::NormalizedRecord;
use crate::error::{Field, FieldViolation, ValidationError};

/// A company that passed every rule and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub total_funding: f64,
    pub current_revenue: f64,
    pub investor_list: Vec<String>,
    pub market_segment: String,
    pub stage: String,
    pub revenue_growth: Option<f64>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reporting {
    FirstViolation,
    AllViolations,
}

/// Stop signal raised once `FirstViolation` mode has seen a violation.
struct Halt;

struct Violations {
    reporting: Reporting,
    found: Vec<FieldViolation>,
}

impl Violations {
    fn push(&mut self, field: Field, message: impl Into<String>) -> Result<(), Halt> {
        self.found.push(FieldViolation {
            field,
            message: message.into(),
        });
        match self.reporting {
            Reporting::FirstViolation => Err(Halt),
            Reporting::AllViolations => Ok(()),
        }
    }
}

/// Validates one record and reports every violated rule.
pub fn validate_record(record: &NormalizedRecord) -> Result<NewCompany, Vec<FieldViolation>> {
    check(record, Reporting::AllViolations)
}

/// Validates a whole batch, halting at the first invalid record.
///
/// Either every record is returned validated, in input order, or none are.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn validate_batch(records: &[NormalizedRecord]) -> Result<Vec<NewCompany>, ValidationError> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            check(record, Reporting::FirstViolation).map_err(|violations| {
                // A failed check always carries at least one violation.
                let (field, message) = violations
                    .into_iter()
                    .next()
                    .map(|first| (first.field, first.message))
                    .unwrap_or((Field::Name, "Invalid company data".to_string()));
                ValidationError {
                    row: idx + 1,
                    field,
                    message,
                }
            })
        })
        .collect()
}

fn check(record: &NormalizedRecord, reporting: Reporting) -> Result<NewCompany, Vec<FieldViolation>> {
    let mut violations = Violations {
        reporting,
        found: Vec::new(),
    };

    match apply_rules(record, &mut violations) {
        Ok(Some(company)) if violations.found.is_empty() => Ok(company),
        _ => Err(violations.found),
    }
}

/// Rules run in a fixed order: name, total funding, current revenue, market segment, stage,
/// then the optional fields.
fn apply_rules(record: &NormalizedRecord, v: &mut Violations) -> Result<Option<NewCompany>, Halt> {
    if record.name.is_empty() {
        v.push(Field::Name, "Company name is required")?;
    }

    let total_funding = match parse_amount(&record.total_funding, "Total funding is required") {
        Ok(amount) => Some(amount),
        Err(message) => {
            v.push(Field::TotalFunding, message)?;
            None
        }
    };

    let current_revenue = match parse_amount(&record.current_revenue, "Current revenue is required") {
        Ok(amount) => Some(amount),
        Err(message) => {
            v.push(Field::CurrentRevenue, message)?;
            None
        }
    };

    if record.market_segment.is_empty() {
        v.push(Field::MarketSegment, "Market segment is required")?;
    }

    if record.stage.is_empty() {
        v.push(Field::Stage, "Stage is required")?;
    }

    let revenue_growth = match record.revenue_growth.as_deref().map(parse_growth) {
        None => None,
        Some(Ok(growth)) => Some(growth),
        Some(Err(message)) => {
            v.push(Field::RevenueGrowth, message)?;
            None
        }
    };

    if let Some(website) = record.website.as_deref() {
        if !is_web_url(website) {
            v.push(Field::Website, "Must be a valid URL")?;
        }
    }

    let (Some(total_funding), Some(current_revenue)) = (total_funding, current_revenue) else {
        return Ok(None);
    };

    Ok(Some(NewCompany {
        name: record.name.clone(),
        total_funding,
        current_revenue,
        investor_list: record.investor_list.clone(),
        market_segment: record.market_segment.clone(),
        stage: record.stage.clone(),
        revenue_growth,
        location: record.location.clone(),
        website: record.website.clone(),
        description: record.description.clone(),
    }))
}

/// An already-stripped amount must be present and parse to a finite, non-negative number.
fn parse_amount(value: &str, required: &'static str) -> Result<f64, &'static str> {
    if value.is_empty() {
        return Err(required);
    }
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err("Must be a valid number"),
    }
}

/// Growth is a percentage and may be negative.
fn parse_growth(value: &str) -> Result<f64, &'static str> {
    match value.parse::<f64>() {
        Ok(growth) if growth.is_finite() => Ok(growth),
        _ => Err("Must be a valid number"),
    }
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}
