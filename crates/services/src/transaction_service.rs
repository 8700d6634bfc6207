use crate::error::ServiceError;
use crate::store::TransactionStore;
use core_types::{Transaction, TransactionDraft};
use database::TransactionFilter;
use std::sync::Arc;
use uuid::Uuid;

pub const TRANSACTIONS_CSV_HEADER: [&str; 6] =
    ["ID", "Type", "Category", "Amount", "Date", "Description"];

/// Validates requests and orchestrates CRUD against a `TransactionStore`.
#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
}

fn parse_id(id: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(id).map_err(|_| {
        tracing::warn!(id, "Invalid transaction id.");
        ServiceError::InvalidId(id.to_string())
    })
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Validates the draft, assigns an id and persists the new transaction.
    pub async fn create(&self, draft: TransactionDraft) -> Result<Transaction, ServiceError> {
        let tr = Transaction::new(draft).map_err(|e| {
            tracing::warn!(error = %e, "Invalid data for new transaction.");
            e
        })?;

        self.store.save(&tr).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to save transaction.");
            e
        })?;

        tracing::info!(id = %tr.id, kind = %tr.kind, "Transaction created.");
        Ok(tr)
    }

    pub async fn get(&self, id: &str) -> Result<Transaction, ServiceError> {
        let uid = parse_id(id)?;
        self.store
            .get(uid)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %uid, "Failed to get transaction.");
                e
            })?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, ServiceError> {
        let transactions = self.store.list(filter).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list transactions.");
            e
        })?;
        Ok(transactions)
    }

    /// Replaces every field of an existing transaction.
    ///
    /// The draft is validated exactly as on creation; the id never changes.
    pub async fn update(&self, id: &str, draft: TransactionDraft) -> Result<Transaction, ServiceError> {
        let mut tr = self.get(id).await?;

        tr.change(draft).map_err(|e| {
            tracing::warn!(error = %e, id, "Invalid data for transaction change.");
            e
        })?;

        self.store.update(&tr).await.map_err(|e| {
            tracing::error!(error = %e, id, "Failed to update transaction.");
            e
        })?;

        tracing::info!(id = %tr.id, "Transaction updated.");
        Ok(tr)
    }

    /// Deletes by id. An id with no matching row is still a success.
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let uid = parse_id(id)?;
        self.store.delete(uid).await.map_err(|e| {
            tracing::error!(error = %e, %uid, "Failed to delete transaction.");
            e
        })?;
        tracing::info!(%uid, "Transaction deleted.");
        Ok(())
    }

    /// Renders the filtered listing as CSV.
    ///
    /// The whole body is built in memory so that a failure never produces a
    /// truncated file.
    pub async fn export_csv(&self, filter: &TransactionFilter) -> Result<Vec<u8>, ServiceError> {
        let transactions = self.list(filter).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(TRANSACTIONS_CSV_HEADER)?;

        for tr in &transactions {
            writer.write_record([
                tr.id.to_string(),
                tr.kind.to_string(),
                tr.category.clone(),
                format!("{:.2}", tr.amount.round_dp(2)),
                tr.date.to_rfc3339(),
                tr.description.clone(),
            ])?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| ServiceError::Export(e.into_error().into()))?;

        tracing::info!(rows = transactions.len(), "CSV generation completed.");
        Ok(body)
    }
}
