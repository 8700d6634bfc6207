use crate::enums::TransactionType;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fraction digits an amount may carry.
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// The unvalidated field set shared by "create" and "change" requests.
///
/// `kind` is kept as a raw string so that an unknown type surfaces as a
/// `CoreError::InvalidType` rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: String,
    pub category: String,
    pub amount: Decimal,
    /// `None` means "now".
    pub date: Option<DateTime<Utc>>,
    pub description: String,
}

/// A single recorded income or expense.
///
/// Instances can only be created through [`Transaction::new`] (or rebuilt from
/// storage with [`Transaction::from_parts`]), so every live value satisfies:
/// `amount > 0`, a non-empty category and a known type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
}

/// The validated fields of a draft, before an id is attached.
struct Validated {
    kind: TransactionType,
    category: String,
    amount: Decimal,
    date: DateTime<Utc>,
    description: String,
}

fn validate(draft: TransactionDraft) -> Result<Validated, CoreError> {
    let kind: TransactionType = draft.kind.parse()?;

    if draft.category.trim().is_empty() {
        return Err(CoreError::EmptyCategory);
    }

    if draft.amount <= Decimal::ZERO {
        return Err(CoreError::NonPositiveAmount(draft.amount.to_string()));
    }

    // Amounts are stored as NUMERIC(18, 2); anything finer would be rounded away.
    if draft.amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(CoreError::TooManyDecimals(draft.amount.to_string()));
    }

    Ok(Validated {
        kind,
        category: draft.category,
        amount: draft.amount,
        date: draft.date.unwrap_or_else(Utc::now),
        description: draft.description,
    })
}

impl Transaction {
    /// Validates a draft and assigns a fresh v4 identifier.
    pub fn new(draft: TransactionDraft) -> Result<Self, CoreError> {
        let v = validate(draft)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind: v.kind,
            category: v.category,
            amount: v.amount,
            date: v.date,
            description: v.description,
        })
    }

    /// Rebuilds a transaction that was already validated before being persisted.
    pub fn from_parts(
        id: Uuid,
        kind: TransactionType,
        category: String,
        amount: Decimal,
        date: DateTime<Utc>,
        description: String,
    ) -> Self {
        Self {
            id,
            kind,
            category,
            amount,
            date,
            description,
        }
    }

    /// Replaces every field except the id.
    ///
    /// The draft goes through the same validation as [`Transaction::new`]; on
    /// failure `self` is left untouched.
    pub fn change(&mut self, draft: TransactionDraft) -> Result<(), CoreError> {
        let v = validate(draft)?;
        self.kind = v.kind;
        self.category = v.category;
        self.amount = v.amount;
        self.date = v.date;
        self.description = v.description;
        Ok(())
    }
}
