//! Bulk company import: parse, normalize, validate, then persist atomically.
//!
//! Parse and validation failures are detected before the store is touched, so a rejected
//! batch never writes anything.

pub mod importer;
pub mod normalizer;
pub mod parser;
pub mod validator;

use sea_orm::DatabaseConnection;

use crate::entities::company;
use crate::error::ImportError;

pub use importer::import_companies;
pub use normalizer::{normalize, normalize_row, NormalizedRecord, RawCompanyRecord};
pub use parser::{parse_csv, RawRow};
pub use validator::{validate_batch, validate_record, NewCompany};

/// Parses, normalizes and validates CSV text without writing anything.
pub fn prepare_csv(input: &str) -> Result<Vec<NewCompany>, ImportError> {
    let rows = parse_csv(input)?;
    let records: Vec<NormalizedRecord> = rows.iter().map(normalize_row).collect();
    prepare(records)
}

/// Normalizes and validates records that were split into fields by the caller.
pub fn prepare_records(raw: &[RawCompanyRecord]) -> Result<Vec<NewCompany>, ImportError> {
    prepare(raw.iter().map(normalize).collect())
}

fn prepare(records: Vec<NormalizedRecord>) -> Result<Vec<NewCompany>, ImportError> {
    if records.is_empty() {
        return Err(ImportError::EmptyBatch);
    }
    Ok(validate_batch(&records)?)
}

#[tracing::instrument(skip(db, input))]
pub async fn import_csv(db: &DatabaseConnection, input: &str) -> Result<Vec<company::Model>, ImportError> {
    let companies = prepare_csv(input)?;
    import_companies(db, companies).await
}

#[tracing::instrument(skip(db, raw), fields(records = raw.len()))]
pub async fn import_records(
    db: &DatabaseConnection,
    raw: &[RawCompanyRecord],
) -> Result<Vec<company::Model>, ImportError> {
    let companies = prepare_records(raw)?;
    import_companies(db, companies).await
}
