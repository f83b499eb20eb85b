//! Period report generation and rendering.
//!
//! [`generate_period_report`] gathers structured data from the ledger;
//! [`render_period_report`] turns it into rich text with every user-supplied or
//! numeric substring escaped.

use crate::{
    core::{
        ledger, markdown,
        period::{Period, PeriodBounds},
    },
    entities::transaction,
    errors::Result,
};
use sea_orm::ConnectionTrait;
use tracing::warn;

/// Totals and rows for one owner and one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    /// Which period this report covers
    pub period: Period,
    /// Transactions within the period, oldest first
    pub transactions: Vec<transaction::Model>,
    /// Sum of positive amounts
    pub income: f64,
    /// Sum of negative amounts (a non-positive number)
    pub expense: f64,
    /// Net result for the period, aggregated by the database
    pub net: f64,
    /// All-time balance for context; `None` if it could not be fetched
    pub overall_balance: Option<f64>,
}

/// Splits amounts into income (`> 0`) and expense (`< 0`) totals.
#[must_use]
pub fn summarize(transactions: &[transaction::Model]) -> (f64, f64) {
    transactions.iter().fold((0.0, 0.0), |(income, expense), tr| {
        if tr.amount > 0.0 {
            (income + tr.amount, expense)
        } else if tr.amount < 0.0 {
            (income, expense + tr.amount)
        } else {
            (income, expense)
        }
    })
}

/// Builds the report for `owner_id` over `bounds`.
///
/// A failure fetching the all-time balance is logged and leaves `overall_balance`
/// empty; every other failure is returned.
///
/// # Arguments
/// * `db` - Database connection
/// * `owner_id` - Owner whose ledger is reported
/// * `period` - Period the bounds were computed for, used for the title
/// * `bounds` - Half-open interval on `transaction_date`
///
/// # Returns
/// A structured `PeriodReport`; `transactions` is empty when nothing matched
pub async fn generate_period_report<C>(
    db: &C,
    owner_id: i64,
    period: Period,
    bounds: PeriodBounds,
) -> Result<PeriodReport>
where
    C: ConnectionTrait,
{
    let transactions = ledger::transactions_by_period(db, owner_id, bounds).await?;
    let (income, expense) = summarize(&transactions);
    let net = if transactions.is_empty() {
        0.0
    } else {
        ledger::sum_by_period(db, owner_id, bounds).await?
    };

    let overall_balance = match ledger::sum_all_time(db, owner_id).await {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!(owner_id, "Failed to fetch all-time balance: {}", e);
            None
        }
    };

    Ok(PeriodReport {
        period,
        transactions,
        income,
        expense,
        net,
        overall_balance,
    })
}

/// Formats an amount with two decimals, keeping the sign.
///
/// Values that round to zero are shown as `0.00`, never `-0.00`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let text = format!("{amount:.2}");
    match text.strip_prefix('-') {
        Some("0.00") => "0.00".to_string(),
        _ => text,
    }
}

/// Plain-text answer for a period without transactions.
#[must_use]
pub fn render_empty_period(period: Period) -> String {
    format!("{}: транзакций не найдено.", period.title())
}

fn money(amount: f64, currency: &str) -> String {
    markdown::escape(&format!("{} {currency}", format_amount(amount)))
}

/// One report line: direction marker, amount, optional comment, category.
#[must_use]
pub fn render_transaction_line(tr: &transaction::Model, currency: &str) -> String {
    let marker = if tr.amount < 0.0 { "➖" } else { "➕" };
    let mut line = format!("{marker} {}", money(tr.amount, currency));
    if !tr.comment.is_empty() {
        line.push_str(" \\| ");
        line.push_str(&markdown::escape(&tr.comment));
    }
    line.push_str(&format!(
        " \\({}\\)",
        markdown::bold(&markdown::escape(&tr.category))
    ));
    line
}

fn total_line(icon: &str, label: &str, amount: f64, currency: &str) -> String {
    format!(
        "{icon} {}: {}",
        markdown::bold(&markdown::escape(label)),
        money(amount, currency)
    )
}

/// Renders the report as rich text.
///
/// # Arguments
/// * `report` - Report data from [`generate_period_report`]
/// * `currency` - Label appended to every amount
///
/// # Returns
/// Markdown with every user-supplied and numeric substring escaped
#[must_use]
pub fn render_period_report(report: &PeriodReport, currency: &str) -> String {
    let mut text = format!(
        "📊 {} 📊\n\n",
        markdown::bold(&markdown::escape(report.period.title()))
    );

    for tr in &report.transactions {
        text.push_str(&render_transaction_line(tr, currency));
        text.push('\n');
    }

    text.push_str("\n\\-\\-\\-\n");
    text.push_str(&total_line("💰", "Доходы", report.income, currency));
    text.push('\n');
    text.push_str(&total_line("💸", "Расходы", report.expense, currency));
    text.push('\n');
    text.push_str(&total_line("📈", "Баланс", report.net, currency));

    if let Some(balance) = report.overall_balance {
        text.push_str("\n\n");
        text.push_str(&total_line("🏦", "Общий баланс", balance, currency));
    }

    text
}
