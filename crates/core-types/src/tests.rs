use super::{CoreError, SortDir, Transaction, TransactionDraft, TransactionType};

use anyhow::Result;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn draft(kind: &str, category: &str, amount: Decimal) -> TransactionDraft {
    TransactionDraft {
        kind: kind.to_string(),
        category: category.to_string(),
        amount,
        date: Some(Utc.with_ymd_and_hms(2025, 11, 27, 0, 0, 0).unwrap()),
        description: "groceries".to_string(),
    }
}

#[test]
fn test_new_transaction_keeps_validated_fields() -> Result<()> {
    let tr = Transaction::new(draft("expense", "food", dec!(12.50)))?;

    assert_eq!(tr.kind, TransactionType::Expense);
    assert_eq!(tr.category, "food");
    assert_eq!(tr.amount, dec!(12.50));
    assert_eq!(tr.date, Utc.with_ymd_and_hms(2025, 11, 27, 0, 0, 0).unwrap());
    assert_eq!(tr.description, "groceries");

    Ok(())
}

#[test]
fn test_non_positive_amount_is_rejected() {
    for amount in [dec!(0), dec!(-0.01), dec!(-100)] {
        let result = Transaction::new(draft("income", "salary", amount));
        assert!(matches!(result, Err(CoreError::NonPositiveAmount(_))));
    }
}

#[test]
fn test_unknown_type_is_rejected() {
    let result = Transaction::new(draft("transfer", "salary", dec!(10)));
    assert_eq!(result, Err(CoreError::InvalidType("transfer".to_string())));
}

#[test]
fn test_blank_category_is_rejected() {
    let result = Transaction::new(draft("income", "   ", dec!(10)));
    assert_eq!(result, Err(CoreError::EmptyCategory));
}

#[test]
fn test_missing_date_defaults_to_now() -> Result<()> {
    let before = Utc::now();
    let mut d = draft("income", "salary", dec!(10));
    d.date = None;

    let tr = Transaction::new(d)?;

    assert!(tr.date >= before);
    assert!(tr.date <= Utc::now());

    Ok(())
}

#[test]
fn test_change_revalidates_and_keeps_id() -> Result<()> {
    let mut tr = Transaction::new(draft("income", "salary", dec!(100)))?;
    let id = tr.id;

    let result = tr.change(draft("income", "salary", dec!(0)));
    assert!(matches!(result, Err(CoreError::NonPositiveAmount(_))));
    assert_eq!(tr.amount, dec!(100));

    tr.change(draft("expense", "rent", dec!(900)))?;
    assert_eq!(tr.id, id);
    assert_eq!(tr.kind, TransactionType::Expense);
    assert_eq!(tr.category, "rent");
    assert_eq!(tr.amount, dec!(900));

    Ok(())
}

#[test]
fn test_transaction_serializes_type_field() -> Result<()> {
    let tr = Transaction::new(draft("income", "salary", dec!(100.25)))?;
    let json = serde_json::to_value(&tr)?;

    assert_eq!(json["type"], "income");
    assert_eq!(json["amount"], 100.25);
    assert_eq!(json["category"], "salary");

    Ok(())
}

#[test]
fn test_type_round_trips_through_str() -> Result<()> {
    assert_eq!("income".parse::<TransactionType>()?, TransactionType::Income);
    assert_eq!(TransactionType::Expense.to_string(), "expense");
    assert!("Income".parse::<TransactionType>().is_err());
    Ok(())
}

#[test]
fn test_amount_with_sub_cent_precision_is_rejected() {
    let result = Transaction::new(draft("expense", "food", dec!(12.345)));
    assert_eq!(result, Err(CoreError::TooManyDecimals("12.345".to_string())));

    // Would round to zero in storage.
    let result = Transaction::new(draft("expense", "food", dec!(0.001)));
    assert!(matches!(result, Err(CoreError::TooManyDecimals(_))));
}

#[test]
fn test_trailing_zeros_do_not_count_as_precision() -> Result<()> {
    let mut tr = Transaction::new(draft("income", "salary", dec!(12.3400)))?;
    assert_eq!(tr.amount, dec!(12.34));

    let result = tr.change(draft("income", "salary", dec!(1.005)));
    assert!(matches!(result, Err(CoreError::TooManyDecimals(_))));
    assert_eq!(tr.amount, dec!(12.34));
    Ok(())
}

#[test]
fn test_sort_dir_is_descending_unless_asc() {
    assert_eq!(SortDir::parse("asc"), SortDir::Asc);
    assert_eq!(SortDir::parse("desc"), SortDir::Desc);
    assert_eq!(SortDir::parse("ASC"), SortDir::Desc);
    assert_eq!(SortDir::parse(""), SortDir::default());
    assert_eq!(SortDir::default(), SortDir::Desc);
}
