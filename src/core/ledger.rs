//! Ledger store - durable CRUD over the `transactions` table.
//!
//! Every function is scoped by owner id; there is no cross-user visibility. Soft-deleted
//! rows (`is_deleted = true`) are filtered out explicitly by every query. Period filters
//! apply to the business timestamp `transaction_date` and are half-open:
//! `start <= transaction_date < end`.

use crate::{
    core::period::PeriodBounds,
    entities::{Transaction, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Select, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::debug;

/// Data needed to record a new transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Chat-platform user id that owns the row
    pub owner_id: i64,
    /// Signed amount
    pub amount: f64,
    /// Free-text comment
    pub comment: String,
    /// Category resolved before saving
    pub category: String,
    /// Business timestamp used for period queries
    pub transaction_date: DateTime<Utc>,
}

/// Base query: the owner's live rows.
fn live_rows(owner_id: i64) -> Select<Transaction> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(owner_id))
        .filter(transaction::Column::IsDeleted.eq(false))
}

/// Restricts a query to the half-open period on `transaction_date`.
fn within(query: Select<Transaction>, bounds: PeriodBounds) -> Select<Transaction> {
    query
        .filter(transaction::Column::TransactionDate.gte(bounds.start))
        .filter(transaction::Column::TransactionDate.lt(bounds.end))
}

/// Inserts a transaction. The database assigns the id; `created_at` is set here.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `new` - Owner, amount, comment, category and business timestamp
///
/// # Returns
/// The stored row, including its assigned id
pub async fn save_transaction<C>(db: &C, new: NewTransaction) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let model = transaction::ActiveModel {
        user_id: Set(new.owner_id),
        amount: Set(new.amount),
        comment: Set(new.comment),
        category: Set(new.category),
        transaction_date: Set(new.transaction_date),
        created_at: Set(Utc::now()),
        is_deleted: Set(false),
        ..Default::default()
    };

    let saved = model.insert(db).await?;
    debug!(owner_id = saved.user_id, id = saved.id, "Transaction saved");
    Ok(saved)
}

/// Retrieves the owner's transactions within `bounds`, oldest id first.
///
/// # Arguments
/// * `db` - Database connection
/// * `owner_id` - Owner whose rows are returned
/// * `bounds` - Half-open interval on `transaction_date`
pub async fn transactions_by_period<C>(
    db: &C,
    owner_id: i64,
    bounds: PeriodBounds,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    within(live_rows(owner_id), bounds)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every live transaction of the owner, oldest id first.
pub async fn all_transactions<C>(db: &C, owner_id: i64) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    live_rows(owner_id)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Runs `SUM(amount)` on the server; an empty set sums to zero.
async fn sum_amount<C>(db: &C, query: Select<Transaction>) -> Result<f64>
where
    C: ConnectionTrait,
{
    let total: Option<Option<f64>> = query
        .select_only()
        .column_as(Expr::col(transaction::Column::Amount).sum(), "total")
        .into_tuple()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0.0))
}

/// Sum of the owner's amounts within `bounds`; `0.0` when nothing matches.
pub async fn sum_by_period<C>(db: &C, owner_id: i64, bounds: PeriodBounds) -> Result<f64>
where
    C: ConnectionTrait,
{
    sum_amount(db, within(live_rows(owner_id), bounds)).await
}

/// Sum of all of the owner's amounts; `0.0` for an empty ledger.
pub async fn sum_all_time<C>(db: &C, owner_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    sum_amount(db, live_rows(owner_id)).await
}

/// Removes the owner's most recent transaction (highest id) and returns it as it was
/// before deletion.
///
/// Lookup and tombstoning happen in one database transaction, so the row that is found
/// is the row that is removed.
///
/// # Arguments
/// * `db` - Database connection; a database transaction is started on it
/// * `owner_id` - Owner whose last row is removed
///
/// # Returns
/// A snapshot of the removed row
///
/// # Errors
/// [`Error::NoTransactions`] when the owner has no live transactions.
pub async fn delete_last<C>(db: &C, owner_id: i64) -> Result<transaction::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let last = live_rows(owner_id)
        .order_by_desc(transaction::Column::Id)
        .one(&txn)
        .await?
        .ok_or(Error::NoTransactions { owner_id })?;

    let mut tombstone: transaction::ActiveModel = last.clone().into();
    tombstone.is_deleted = Set(true);
    tombstone.update(&txn).await?;

    txn.commit().await?;
    debug!(owner_id, id = last.id, "Last transaction deleted");
    Ok(last)
}

/// Removes every transaction of the owner within `bounds`.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `owner_id` - Owner whose rows are removed
/// * `bounds` - Half-open interval on `transaction_date`
///
/// # Returns
/// How many rows were removed; zero is a valid result
pub async fn delete_by_period<C>(db: &C, owner_id: i64, bounds: PeriodBounds) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Transaction::update_many()
        .col_expr(transaction::Column::IsDeleted, Expr::value(true))
        .filter(transaction::Column::UserId.eq(owner_id))
        .filter(transaction::Column::IsDeleted.eq(false))
        .filter(transaction::Column::TransactionDate.gte(bounds.start))
        .filter(transaction::Column::TransactionDate.lt(bounds.end))
        .exec(db)
        .await?;

    debug!(owner_id, count = result.rows_affected, "Transactions deleted by period");
    Ok(result.rows_affected)
}
