//! Transaction entity - One recorded financial event in an owner's ledger.
//!
//! Amounts are signed: positive values are income, negative values are expenses.
//! `transaction_date` is the business timestamp used for every period query, while
//! `created_at` records when the row was written. Rows are never updated in place
//! except to set the `is_deleted` tombstone.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Surrogate identity, monotonically assigned by the database
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Chat-platform user id that owns this transaction
    pub user_id: i64,
    /// Signed amount (positive for income, negative for spending)
    pub amount: f64,
    /// Free-text comment, may be empty
    pub comment: String,
    /// Category assigned at creation; never recomputed
    pub category: String,
    /// Business timestamp used for period filtering
    pub transaction_date: DateTimeUtc,
    /// When the row was written
    pub created_at: DateTimeUtc,
    /// Soft delete flag - if true, the transaction is hidden from every query
    pub is_deleted: bool,
}

/// Transactions stand alone; there are no related tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
