//! Shared test utilities for `MoneyBuddy`.
//!
//! This module provides helpers for setting up test databases, inserting
//! transactions with sensible defaults and scripting the classifier.

use crate::{
    classifier::{Classifier, match_category},
    config::AppConfig,
    core::{
        category::{FALLBACK_CATEGORY, INCOME_CATEGORY},
        ledger::{self, NewTransaction},
        router::Router,
    },
    entities,
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::sync::{Arc, Mutex};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed "now" for tests: Wednesday 2024-03-13 12:00:00 UTC.
#[must_use]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Inserts a transaction with sensible defaults.
///
/// # Defaults
/// * `comment`: `"Test transaction"`
/// * `category`: `"Доход"` (if non-negative) or `"Прочее"` (if negative)
pub async fn insert_test_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: f64,
    transaction_date: DateTime<Utc>,
) -> Result<entities::transaction::Model> {
    let category = if amount < 0.0 {
        FALLBACK_CATEGORY
    } else {
        INCOME_CATEGORY
    };
    insert_custom_transaction(
        db,
        owner_id,
        amount,
        "Test transaction",
        category,
        transaction_date,
    )
    .await
}

/// Inserts a transaction with custom comment and category.
pub async fn insert_custom_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    amount: f64,
    comment: &str,
    category: &str,
    transaction_date: DateTime<Utc>,
) -> Result<entities::transaction::Model> {
    ledger::save_transaction(
        db,
        NewTransaction {
            owner_id,
            amount,
            comment: comment.to_string(),
            category: category.to_string(),
            transaction_date,
        },
    )
    .await
}

/// Classifier double that answers with a fixed reply and records every comment it sees.
#[derive(Debug, Default)]
pub struct FakeClassifier {
    reply: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeClassifier {
    /// Answers every request with `reply`, validated like a real service reply.
    #[must_use]
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::default(),
        }
    }

    /// Fails every request.
    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }

    /// Comments passed to `classify`, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, comment: &str, categories: &[String]) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(comment.to_string());
        }

        let reply = self
            .reply
            .as_deref()
            .ok_or_else(|| Error::classification("service unavailable"))?;
        match_category(reply, categories)
            .map(str::to_string)
            .ok_or_else(|| Error::classification(format!("unknown category '{reply}'")))
    }
}

/// Sets up a router over a fresh database with default settings.
/// Returns (router, classifier); the database is reachable through
/// [`Router::database`].
pub async fn setup_router(classifier: FakeClassifier) -> Result<(Router, Arc<FakeClassifier>)> {
    let db = setup_test_db().await?;
    let classifier = Arc::new(classifier);
    let shared: Arc<FakeClassifier> = Arc::clone(&classifier);
    let router = Router::new(db, shared, Arc::new(AppConfig::default()));
    Ok((router, classifier))
}
