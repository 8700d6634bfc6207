use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::Transaction;
use database::{DbError, DbRepository, TransactionFilter};
use uuid::Uuid;

/// What the transaction service needs from persistence.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn save(&self, tr: &Transaction) -> Result<(), DbError>;

    /// `Ok(None)` when no row has this id.
    async fn get(&self, id: Uuid) -> Result<Option<Transaction>, DbError>;

    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DbError>;

    async fn update(&self, tr: &Transaction) -> Result<(), DbError>;

    /// Removing an absent id succeeds.
    async fn delete(&self, id: Uuid) -> Result<(), DbError>;
}

/// What the analytics service needs from persistence: the raw rows of a date range.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn transactions_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DbError>;
}

#[async_trait]
impl TransactionStore for DbRepository {
    async fn save(&self, tr: &Transaction) -> Result<(), DbError> {
        self.save_transaction(tr).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>, DbError> {
        self.get_transaction(id).await
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DbError> {
        self.list_transactions(filter).await
    }

    async fn update(&self, tr: &Transaction) -> Result<(), DbError> {
        self.update_transaction(tr).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.delete_transaction(id).await
    }
}

#[async_trait]
impl AnalyticsSource for DbRepository {
    async fn transactions_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DbError> {
        self.get_transactions_in_range(from, to).await
    }
}
