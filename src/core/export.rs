//! CSV export of an owner's ledger.

use crate::{core::report::format_amount, entities::transaction, errors::Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Column headings of the exported file
pub const CSV_HEADER: [&str; 5] = ["ID", "Дата", "Сумма", "Комментарий", "Категория"];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encodes `transactions` as CSV with a header row. Dates are shown in `tz`.
///
/// Quoting of commas, quotes and line breaks is handled by the `csv` writer.
pub fn render_csv(transactions: &[transaction::Model], tz: Tz) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for tr in transactions {
        writer.write_record([
            tr.id.to_string(),
            tr.transaction_date
                .with_timezone(&tz)
                .format(DATE_FORMAT)
                .to_string(),
            format_amount(tr.amount),
            tr.comment.clone(),
            tr.category.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}

/// Attachment name for an export made at `now`, e.g. `transactions_2024-03-13.csv`.
#[must_use]
pub fn export_file_name(now: DateTime<Utc>, tz: Tz) -> String {
    format!("transactions_{}.csv", now.with_timezone(&tz).format("%Y-%m-%d"))
}
