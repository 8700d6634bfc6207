use crate::store::{AnalyticsSource, TransactionStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{SortDir, Transaction};
use database::{DbError, TransactionFilter, TransactionSortBy};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A process-local store with the same observable behavior as `DbRepository`.
///
/// Used by the test suites of this crate and of the web server, and handy for
/// running the API without a database.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<Uuid, Transaction>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with already validated transactions.
    pub fn with_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let rows = transactions.into_iter().map(|tr| (tr.id, tr)).collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn compare(a: &Transaction, b: &Transaction, sort_by: TransactionSortBy) -> Ordering {
    match sort_by {
        TransactionSortBy::Id => a.id.cmp(&b.id),
        TransactionSortBy::Type => a.kind.as_str().cmp(b.kind.as_str()),
        TransactionSortBy::Category => a.category.cmp(&b.category),
        TransactionSortBy::Amount => a.amount.cmp(&b.amount),
        TransactionSortBy::Date => a.date.cmp(&b.date),
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn save(&self, tr: &Transaction) -> Result<(), DbError> {
        self.rows.write().await.insert(tr.id, tr.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>, DbError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DbError> {
        let mut found: Vec<Transaction> = self
            .rows
            .read()
            .await
            .values()
            .filter(|tr| filter.matches(tr))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            let primary = compare(a, b, filter.sort_by);
            let primary = match filter.sort_dir {
                SortDir::Asc => primary,
                SortDir::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });
        Ok(found)
    }

    async fn update(&self, tr: &Transaction) -> Result<(), DbError> {
        match self.rows.write().await.get_mut(&tr.id) {
            Some(existing) => {
                *existing = tr.clone();
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AnalyticsSource for InMemoryStore {
    async fn transactions_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DbError> {
        let mut found: Vec<Transaction> = self
            .rows
            .read()
            .await
            .values()
            .filter(|tr| tr.date >= from && tr.date <= to)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}
