//! All-or-nothing persistence of a validated batch.

use sea_orm::{DatabaseConnection, TransactionTrait};

use super::validator::NewCompany;
use crate::entities::company;
use crate::error::ImportError;
use crate::store;

/// Creates one company per record inside a single transaction, in input order.
///
/// A failed insert rolls back the whole batch, so readers never observe part of an import.
#[tracing::instrument(skip(db, companies), fields(records = companies.len()))]
pub async fn import_companies(
    db: &DatabaseConnection,
    companies: Vec<NewCompany>,
) -> Result<Vec<company::Model>, ImportError> {
    if companies.is_empty() {
        return Err(ImportError::EmptyBatch);
    }

    let txn = db.begin().await?;
    let mut created = Vec::with_capacity(companies.len());

    for (idx, new) in companies.into_iter().enumerate() {
        match store::insert_company(&txn, new).await {
            Ok(model) => created.push(model),
            Err(e) => {
                tracing::error!(row = idx + 1, error = %e, "Insert failed; rolling back import");
                // Report the insert error even if the rollback fails too.
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Rollback of failed import also failed");
                }
                return Err(ImportError::Store(e));
            }
        }
    }

    txn.commit().await?;
    tracing::info!("Imported {} companies", created.len());
    Ok(created)
}
