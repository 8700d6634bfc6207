use crate::retry::with_retry;
use crate::DbError;
use chrono::{DateTime, Utc};
use configuration::RetryPolicy;
use core_types::{SortDir, Transaction, TransactionType};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, QueryBuilder};
use uuid::Uuid;

const SELECT_TRANSACTIONS: &str =
    "SELECT id, transtype, category, amount, transdate, description FROM transactions";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
    retry: RetryPolicy,
}

/// This struct represents a row fetched from the transactions table.
#[derive(FromRow, Debug, Clone)]
pub struct DbTransaction {
    pub id: Uuid,
    pub transtype: String,
    pub category: String,
    pub amount: Decimal,
    pub transdate: DateTime<Utc>,
    pub description: String,
}

impl TryFrom<DbTransaction> for Transaction {
    type Error = DbError;

    fn try_from(row: DbTransaction) -> Result<Self, Self::Error> {
        let kind: TransactionType = row
            .transtype
            .parse()
            .map_err(|e| DbError::Corrupt(format!("row {}: {}", row.id, e)))?;
        Ok(Transaction::from_parts(
            row.id,
            kind,
            row.category,
            row.amount,
            row.transdate,
            row.description,
        ))
    }
}

/// Columns a transaction listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSortBy {
    Id,
    Type,
    Category,
    Amount,
    #[default]
    Date,
}

impl TransactionSortBy {
    /// Unknown or empty values fall back to the transaction date.
    pub fn parse(s: &str) -> Self {
        match s {
            "id" => TransactionSortBy::Id,
            "type" | "transtype" => TransactionSortBy::Type,
            "category" => TransactionSortBy::Category,
            "amount" => TransactionSortBy::Amount,
            _ => TransactionSortBy::Date,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            TransactionSortBy::Id => "id",
            TransactionSortBy::Type => "transtype",
            TransactionSortBy::Category => "category",
            TransactionSortBy::Amount => "amount",
            TransactionSortBy::Date => "transdate",
        }
    }
}

/// Optional filters and ordering for listing transactions.
///
/// The default value matches every row, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub sort_by: TransactionSortBy,
    pub sort_dir: SortDir,
}

impl TransactionFilter {
    /// Whether a transaction passes every filter (ordering is ignored).
    pub fn matches(&self, tr: &Transaction) -> bool {
        self.from.is_none_or(|from| tr.date >= from)
            && self.to.is_none_or(|to| tr.date <= to)
            && self.kind.is_none_or(|kind| tr.kind == kind)
            && self.category.as_deref().is_none_or(|c| tr.category == c)
    }

    /// Builds the filtered, ordered SELECT statement.
    pub fn to_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_TRANSACTIONS);
        qb.push(" WHERE 1=1");

        if let Some(from) = self.from {
            qb.push(" AND transdate >= ").push_bind(from);
        }
        if let Some(to) = self.to {
            qb.push(" AND transdate <= ").push_bind(to);
        }
        if let Some(kind) = self.kind {
            qb.push(" AND transtype = ").push_bind(kind.as_str());
        }
        if let Some(category) = &self.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }

        let direction = match self.sort_dir {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        };
        // The column comes from a closed enum, never from user input.
        qb.push(format!(" ORDER BY {} {}, id ASC", self.sort_by.column(), direction));
        qb
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// Inserts a new, already validated transaction.
    pub async fn save_transaction(&self, tr: &Transaction) -> Result<(), DbError> {
        let pool = &self.pool;
        with_retry(&self.retry, "save_transaction", move || async move {
            sqlx::query(
                r#"
                INSERT INTO transactions (id, transtype, category, amount, transdate, description)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(tr.id)
            .bind(tr.kind.as_str())
            .bind(&tr.category)
            .bind(tr.amount)
            .bind(tr.date)
            .bind(&tr.description)
            .execute(pool)
            .await
        })
        .await?;
        Ok(())
    }

    /// Fetches a single transaction; `None` when no row has this id.
    pub async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>, DbError> {
        let pool = &self.pool;
        let row = with_retry(&self.retry, "get_transaction", move || async move {
            sqlx::query_as::<_, DbTransaction>(
                "SELECT id, transtype, category, amount, transdate, description FROM transactions WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await
        })
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    /// Lists transactions matching `filter`, in the requested order.
    pub async fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, DbError> {
        let pool = &self.pool;
        let rows = with_retry(&self.retry, "list_transactions", move || async move {
            let mut qb = filter.to_query();
            qb.build_query_as::<DbTransaction>().fetch_all(pool).await
        })
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Overwrites every mutable column of an existing row.
    ///
    /// Returns `DbError::NotFound` if the row disappeared in the meantime.
    pub async fn update_transaction(&self, tr: &Transaction) -> Result<(), DbError> {
        let pool = &self.pool;
        let result = with_retry(&self.retry, "update_transaction", move || async move {
            sqlx::query(
                r#"
                UPDATE transactions
                SET transtype = $1, category = $2, amount = $3, transdate = $4, description = $5
                WHERE id = $6
                "#,
            )
            .bind(tr.kind.as_str())
            .bind(&tr.category)
            .bind(tr.amount)
            .bind(tr.date)
            .bind(&tr.description)
            .bind(tr.id)
            .execute(pool)
            .await
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Deletes a transaction. Deleting an id that does not exist is a no-op.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), DbError> {
        let pool = &self.pool;
        let result = with_retry(&self.retry, "delete_transaction", move || async move {
            sqlx::query("DELETE FROM transactions WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await
        })
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(%id, "Delete matched no rows.");
        }
        Ok(())
    }

    /// Fetches every transaction dated within the closed interval `[from, to]`,
    /// oldest first. This is the raw input of the analytics engine.
    pub async fn get_transactions_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DbError> {
        let pool = &self.pool;
        let rows = with_retry(&self.retry, "get_transactions_in_range", move || async move {
            sqlx::query_as::<_, DbTransaction>(
                r#"
                SELECT id, transtype, category, amount, transdate, description
                FROM transactions
                WHERE transdate >= $1 AND transdate <= $2
                ORDER BY transdate ASC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
        })
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }
}
