//! Command router - turns one inbound chat message into one reply.
//!
//! The router is stateless across messages. Commands go straight to a report, export
//! or delete operation; anything else is parsed as a transaction, classified when it is
//! an expense with a comment, and saved. Every failure is logged and answered with a
//! user-facing message, so no single message can stop the event loop.
//!
//! The router knows nothing about the chat platform: it returns a [`Reply`] that the
//! bot layer delivers.

use crate::{
    classifier::Classifier,
    config::AppConfig,
    core::{
        category::{FALLBACK_CATEGORY, INCOME_CATEGORY},
        export,
        ledger::{self, NewTransaction},
        locks::OwnerLocks,
        parser::{self, ParsedEntry},
        period::Period,
        report,
    },
    errors::Error,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Answer to a message that is neither a command nor a transaction
pub const USAGE_HINT: &str = "Пожалуйста, введите число (например, 1000 или -500 на кофе).";

/// Answer to an unrecognized command
pub const UNKNOWN_COMMAND: &str = "Я не знаю такой команды.";

/// Answer when a transaction could not be persisted
pub const SAVE_FAILED: &str = "Произошла ошибка при сохранении транзакции. Попробуйте еще раз.";

/// Greeting and command overview, already escaped for rich text
pub const START_TEXT: &str = "Привет\\! Я твой бот\\-помощник для учёта финансов\\.\n\n\
    **Основные команды:**\n\
    `1000` \\- записать доход\n\
    `-500 кофе` \\- записать расход с комментарием\n\n\
    **Отчёты:**\n\
    /today \\- итоги за сегодня\n\
    /week \\- итоги за неделю\n\
    /month \\- итоги за месяц\n\
    /export \\- выгрузить всё в CSV\n\n\
    **Управление данными:**\n\
    /clear\\_last \\- удалить последнюю запись\n\
    /clear\\_today \\- удалить все записи за сегодня";

/// A command a user can issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Greeting with usage help (`/start`, `/help`)
    Start,
    /// Report for a period (`/today`, `/week`, `/month`)
    Report(Period),
    /// CSV export of the whole ledger (`/export`)
    Export,
    /// Delete the most recent transaction (`/clear_last`, `/clearlast`)
    ClearLast,
    /// Delete today's transactions (`/clear_today`, `/cleartoday`)
    ClearToday,
    /// Anything else that starts with `/`
    Unknown(String),
}

impl Command {
    /// Maps a bare command name (without `/`) to a command.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "start" | "help" => Self::Start,
            "today" => Self::Report(Period::Today),
            "week" => Self::Report(Period::Week),
            "month" => Self::Report(Period::Month),
            "export" => Self::Export,
            "clear_last" | "clearlast" => Self::ClearLast,
            "clear_today" | "cleartoday" => Self::ClearToday,
            _ => Self::Unknown(name.to_string()),
        }
    }

    /// Recognizes a command message: `/name`, optionally `@botname`, optionally
    /// followed by arguments (which are ignored).
    ///
    /// Returns `None` for text that is not a command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let token = rest.split_whitespace().next().unwrap_or("");
        let name = token.split('@').next().unwrap_or(token);
        Some(Self::from_name(name))
    }
}

/// A message delivered by the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// User id that scopes all data
    pub owner_id: i64,
    /// Conversation the message came from; replies go back there
    pub chat_id: u64,
    /// Raw message text
    pub text: String,
}

/// What the bot should send back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A text message
    Text {
        /// Message body
        body: String,
        /// `true` when `body` is rich text whose user parts are already escaped
        markdown: bool,
    },
    /// A file attachment
    Document {
        /// Attachment name
        file_name: String,
        /// File contents
        bytes: Vec<u8>,
    },
}

impl Reply {
    /// Plain-text reply; the transport shows it literally.
    pub fn plain(body: impl Into<String>) -> Self {
        Self::Text {
            body: body.into(),
            markdown: false,
        }
    }

    /// Rich-text reply.
    pub fn markdown(body: impl Into<String>) -> Self {
        Self::Text {
            body: body.into(),
            markdown: true,
        }
    }

    /// Body of a text reply.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { body, .. } => Some(body),
            Self::Document { .. } => None,
        }
    }
}

/// Orchestrates parser, classifier and ledger for inbound messages
pub struct Router {
    db: DatabaseConnection,
    classifier: Arc<dyn Classifier>,
    config: Arc<AppConfig>,
    locks: OwnerLocks,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router over an open database connection.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        classifier: Arc<dyn Classifier>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            classifier,
            config,
            locks: OwnerLocks::new(),
        }
    }

    /// Connection the router reads and writes through.
    #[must_use]
    pub const fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Handles one inbound message at the current time.
    pub async fn handle_message(&self, message: &InboundMessage) -> Reply {
        self.handle_message_at(message, Utc::now()).await
    }

    /// Handles one inbound message as if it arrived at `now`.
    #[instrument(
        skip(self, message),
        fields(owner_id = message.owner_id, chat_id = message.chat_id)
    )]
    pub async fn handle_message_at(&self, message: &InboundMessage, now: DateTime<Utc>) -> Reply {
        if let Some(command) = Command::parse(&message.text) {
            return self.dispatch_at(message.owner_id, command, now).await;
        }

        match parser::parse_entry(&message.text) {
            Some(entry) => self.record_entry(message.owner_id, entry, now).await,
            None => {
                debug!("Message is not a transaction, sending usage hint");
                Reply::plain(USAGE_HINT)
            }
        }
    }

    /// Runs `command` for `owner_id` at the current time.
    pub async fn dispatch(&self, owner_id: i64, command: Command) -> Reply {
        self.dispatch_at(owner_id, command, Utc::now()).await
    }

    /// Runs `command` for `owner_id` as if issued at `now`.
    #[instrument(skip(self, now))]
    pub async fn dispatch_at(&self, owner_id: i64, command: Command, now: DateTime<Utc>) -> Reply {
        info!(?command, "Handling command");
        match command {
            Command::Start => Reply::markdown(START_TEXT),
            Command::Report(period) => self.report(owner_id, period, now).await,
            Command::Export => self.export(owner_id, now).await,
            Command::ClearLast => self.clear_last(owner_id).await,
            Command::ClearToday => self.clear_today(owner_id, now).await,
            Command::Unknown(name) => {
                warn!(command = %name, "Unknown command");
                Reply::plain(UNKNOWN_COMMAND)
            }
        }
    }

    /// Picks the category for a parsed entry.
    ///
    /// Income never reaches the classifier. Expenses without a comment, and every
    /// classifier failure, fall back to [`FALLBACK_CATEGORY`].
    pub async fn resolve_category(&self, owner_id: i64, entry: &ParsedEntry) -> String {
        if entry.amount >= 0.0 {
            return INCOME_CATEGORY.to_string();
        }
        if entry.comment.is_empty() {
            return FALLBACK_CATEGORY.to_string();
        }

        match self
            .classifier
            .classify(&entry.comment, &self.config.categories)
            .await
        {
            Ok(category) => {
                debug!(owner_id, %category, "Expense classified");
                category
            }
            Err(e) => {
                warn!(owner_id, "Classification failed, using fallback: {}", e);
                FALLBACK_CATEGORY.to_string()
            }
        }
    }

    async fn record_entry(&self, owner_id: i64, entry: ParsedEntry, now: DateTime<Utc>) -> Reply {
        let category = self.resolve_category(owner_id, &entry).await;

        let new = NewTransaction {
            owner_id,
            amount: entry.amount,
            comment: entry.comment,
            category,
            transaction_date: now,
        };

        let saved = {
            let _guard = self.locks.acquire(owner_id).await;
            ledger::save_transaction(&self.db, new).await
        };

        match saved {
            Ok(tr) => {
                info!(
                    owner_id,
                    id = tr.id,
                    amount = tr.amount,
                    category = %tr.category,
                    "Transaction saved"
                );
                Reply::plain(render_confirmation(&tr.comment, tr.amount, &tr.category))
            }
            Err(e) => {
                error!(owner_id, "Failed to save transaction: {}", e);
                Reply::plain(SAVE_FAILED)
            }
        }
    }

    async fn report(&self, owner_id: i64, period: Period, now: DateTime<Utc>) -> Reply {
        let bounds = period.bounds(now, self.config.timezone);
        match report::generate_period_report(&self.db, owner_id, period, bounds).await {
            Ok(report) if report.transactions.is_empty() => {
                Reply::plain(report::render_empty_period(period))
            }
            Ok(report) => {
                debug!(owner_id, count = report.transactions.len(), "Report generated");
                Reply::markdown(report::render_period_report(&report, &self.config.currency))
            }
            Err(e) => {
                error!(owner_id, ?period, "Failed to build report: {}", e);
                Reply::plain("Ошибка при получении данных.")
            }
        }
    }

    async fn export(&self, owner_id: i64, now: DateTime<Utc>) -> Reply {
        let transactions = match ledger::all_transactions(&self.db, owner_id).await {
            Ok(transactions) => transactions,
            Err(e) => {
                error!(owner_id, "Failed to fetch transactions for export: {}", e);
                return Reply::plain("Ошибка при получении данных для экспорта.");
            }
        };

        if transactions.is_empty() {
            return Reply::plain("Нет транзакций для экспорта.");
        }

        match export::render_csv(&transactions, self.config.timezone) {
            Ok(bytes) => {
                info!(owner_id, count = transactions.len(), "Export generated");
                Reply::Document {
                    file_name: export::export_file_name(now, self.config.timezone),
                    bytes,
                }
            }
            Err(e) => {
                error!(owner_id, "Failed to encode CSV export: {}", e);
                Reply::plain("Ошибка при создании CSV-файла.")
            }
        }
    }

    async fn clear_last(&self, owner_id: i64) -> Reply {
        let deleted = {
            let _guard = self.locks.acquire(owner_id).await;
            ledger::delete_last(&self.db, owner_id).await
        };

        match deleted {
            Ok(tr) => {
                info!(owner_id, id = tr.id, "Last transaction deleted");
                Reply::plain(format!(
                    "✅ Последняя транзакция удалена:\n\nСумма: {}\nКомментарий: {}\nКатегория: {}",
                    report::format_amount(tr.amount),
                    tr.comment,
                    tr.category
                ))
            }
            Err(Error::NoTransactions { .. }) => {
                info!(owner_id, "Nothing to delete");
                Reply::plain("Нет транзакций для удаления.")
            }
            Err(e) => {
                error!(owner_id, "Failed to delete last transaction: {}", e);
                Reply::plain("Произошла ошибка при удалении последней транзакции.")
            }
        }
    }

    async fn clear_today(&self, owner_id: i64, now: DateTime<Utc>) -> Reply {
        let bounds = Period::Today.bounds(now, self.config.timezone);
        let deleted = {
            let _guard = self.locks.acquire(owner_id).await;
            ledger::delete_by_period(&self.db, owner_id, bounds).await
        };

        match deleted {
            Ok(0) => Reply::plain("За сегодня не найдено транзакций для удаления."),
            Ok(count) => {
                info!(owner_id, count, "Today's transactions deleted");
                Reply::plain(format!("✅ Удалено {count} транзакций за сегодня."))
            }
            Err(e) => {
                error!(owner_id, "Failed to delete today's transactions: {}", e);
                Reply::plain("Произошла ошибка при удалении транзакций.")
            }
        }
    }
}

/// Confirmation shown after a transaction is saved.
#[must_use]
pub fn render_confirmation(comment: &str, amount: f64, category: &str) -> String {
    let mut text = if amount >= 0.0 {
        "✅ Доход успешно сохранён!".to_string()
    } else {
        "✅ Расход успешно сохранён!".to_string()
    };
    text.push_str("\nСумма: ");
    text.push_str(&report::format_amount(amount));
    if !comment.is_empty() {
        text.push_str("\nКомментарий: ");
        text.push_str(comment);
    }
    text.push_str("\nКатегория: ");
    text.push_str(category);
    text
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Result;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    const OWNER: i64 = 42;

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            owner_id: OWNER,
            chat_id: 900,
            text: text.to_string(),
        }
    }

    fn body(reply: &Reply) -> &str {
        reply.text().unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Start));
        assert_eq!(Command::parse("/today"), Some(Command::Report(Period::Today)));
        assert_eq!(Command::parse("/week now"), Some(Command::Report(Period::Week)));
        assert_eq!(Command::parse("/Month"), Some(Command::Report(Period::Month)));
        assert_eq!(Command::parse("/export"), Some(Command::Export));
        assert_eq!(Command::parse("/clear_last"), Some(Command::ClearLast));
        assert_eq!(Command::parse("/clearlast@MoneyBuddyBot"), Some(Command::ClearLast));
        assert_eq!(Command::parse("/clear_today"), Some(Command::ClearToday));
        assert_eq!(Command::parse("/cleartoday"), Some(Command::ClearToday));
        assert_eq!(
            Command::parse("/balance"),
            Some(Command::Unknown("balance".to_string()))
        );
        assert_eq!(Command::parse("/"), Some(Command::Unknown(String::new())));
        assert_eq!(Command::parse("-500 кофе"), None);
        assert_eq!(Command::parse("start"), None);
    }

    #[test]
    fn test_render_confirmation() {
        assert_eq!(
            render_confirmation("кофе", -500.0, "Продукты"),
            "✅ Расход успешно сохранён!\nСумма: -500.00\nКомментарий: кофе\nКатегория: Продукты"
        );
        assert_eq!(
            render_confirmation("", 1500.0, "Доход"),
            "✅ Доход успешно сохранён!\nСумма: 1500.00\nКатегория: Доход"
        );
        assert_eq!(
            render_confirmation("", -0.0, "Доход"),
            "✅ Доход успешно сохранён!\nСумма: 0.00\nКатегория: Доход"
        );
    }

    #[tokio::test]
    async fn test_expense_is_classified_and_saved() -> Result<()> {
        let (router, fake) = setup_router(FakeClassifier::answering("Продукты")).await?;
        let db = router.database();

        let reply = router.handle_message_at(&message("-500 кофе"), test_now()).await;
        let text = body(&reply);
        assert!(text.contains("500.00"));
        assert!(text.contains("Продукты"));
        assert!(text.contains("кофе"));

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, -500.0);
        assert_eq!(rows[0].comment, "кофе");
        assert_eq!(rows[0].category, "Продукты");
        assert_eq!(rows[0].transaction_date, test_now());
        assert_eq!(fake.calls(), vec!["кофе".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_classifier_casing_is_canonicalized() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::answering("продукты")).await?;
        let db = router.database();

        router.handle_message_at(&message("-120 хлеб"), test_now()).await;

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows[0].category, "Продукты");
        Ok(())
    }

    #[tokio::test]
    async fn test_income_skips_classifier() -> Result<()> {
        let (router, fake) = setup_router(FakeClassifier::answering("Продукты")).await?;
        let db = router.database();

        let reply = router.handle_message_at(&message("1500"), test_now()).await;
        assert!(body(&reply).contains("Доход"));

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows[0].amount, 1500.0);
        assert_eq!(rows[0].comment, "");
        assert_eq!(rows[0].category, INCOME_CATEGORY);
        assert!(fake.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_amount_is_income() -> Result<()> {
        let (router, fake) = setup_router(FakeClassifier::answering("Продукты")).await?;
        let db = router.database();

        router.handle_message_at(&message("0 проверка"), test_now()).await;

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows[0].amount, 0.0);
        assert_eq!(rows[0].category, INCOME_CATEGORY);
        assert!(fake.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_expense_without_comment_uses_fallback() -> Result<()> {
        let (router, fake) = setup_router(FakeClassifier::answering("Продукты")).await?;
        let db = router.database();

        let reply = router.handle_message_at(&message("-300"), test_now()).await;
        assert!(body(&reply).contains(FALLBACK_CATEGORY));

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows[0].category, FALLBACK_CATEGORY);
        assert!(fake.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_classifier_failure_uses_fallback() -> Result<()> {
        let (router, fake) = setup_router(FakeClassifier::failing()).await?;
        let db = router.database();

        let reply = router.handle_message_at(&message("-99.90 что-то"), test_now()).await;
        let text = body(&reply);
        assert!(text.contains("-99.90"));
        assert!(text.contains(FALLBACK_CATEGORY));

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows[0].category, FALLBACK_CATEGORY);
        assert_eq!(fake.calls().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_hallucinated_category_uses_fallback() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::answering("Кофейни")).await?;
        let db = router.database();

        router.handle_message_at(&message("-200 латте"), test_now()).await;

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows[0].category, FALLBACK_CATEGORY);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_number_gets_usage_hint() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;
        let db = router.database();

        let reply = router.handle_message_at(&message("кофе за 500"), test_now()).await;
        assert_eq!(reply, Reply::plain(USAGE_HINT));
        assert!(ledger::all_transactions(db, OWNER).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_command() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;

        let reply = router.handle_message_at(&message("/balance"), test_now()).await;
        assert_eq!(reply, Reply::plain(UNKNOWN_COMMAND));
        Ok(())
    }

    #[tokio::test]
    async fn test_start_is_markdown_help() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;

        let reply = router.handle_message_at(&message("/start"), test_now()).await;
        assert_eq!(reply, Reply::markdown(START_TEXT));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_for_empty_period() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;

        let reply = router
            .dispatch_at(OWNER, Command::Report(Period::Today), test_now())
            .await;
        assert_eq!(reply, Reply::plain("Итоги за сегодня: транзакций не найдено."));
        Ok(())
    }

    #[tokio::test]
    async fn test_week_report_lists_escaped_rows_and_totals() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::answering("Продукты")).await?;
        let db = router.database();
        let monday = test_now() - chrono::TimeDelta::days(2);
        let last_week = test_now() - chrono::TimeDelta::days(7);
        insert_custom_transaction(db, OWNER, 1500.0, "аванс", "Доход", monday).await?;
        insert_custom_transaction(db, OWNER, -500.0, "кофе (2 шт.)!", "Продукты", test_now())
            .await?;
        insert_custom_transaction(db, OWNER, -1000.0, "старое", "Прочее", last_week).await?;

        let reply = router
            .dispatch_at(OWNER, Command::Report(Period::Week), test_now())
            .await;
        let Reply::Text { body, markdown } = reply else {
            panic!("expected a text reply");
        };
        assert!(markdown);
        assert!(body.contains("**Итоги за неделю**"));
        assert!(body.contains("➕ 1500\\.00 руб\\. \\| аванс"));
        assert!(body.contains("➖ \\-500\\.00 руб\\. \\| кофе \\(2 шт\\.\\)\\! \\(**Продукты**\\)"));
        assert!(!body.contains("старое"));
        assert!(body.contains("**Доходы**: 1500\\.00"));
        assert!(body.contains("**Расходы**: \\-500\\.00"));
        assert!(body.contains("**Баланс**: 1000\\.00"));
        assert!(body.contains("**Общий баланс**: 0\\.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_export_without_transactions() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;

        let reply = router.dispatch_at(OWNER, Command::Export, test_now()).await;
        assert_eq!(reply, Reply::plain("Нет транзакций для экспорта."));
        Ok(())
    }

    #[tokio::test]
    async fn test_export_sends_csv_document() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;
        let db = router.database();
        insert_custom_transaction(db, OWNER, -42.0, "обед, кофе", "Еда вне дома", test_now())
            .await?;
        insert_test_transaction(db, OWNER + 1, 1.0, test_now()).await?;

        let reply = router.dispatch_at(OWNER, Command::Export, test_now()).await;
        let Reply::Document { file_name, bytes } = reply else {
            panic!("expected a document reply");
        };
        assert_eq!(file_name, "transactions_2024-03-13.csv");

        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ID,Дата,Сумма,Комментарий,Категория");
        assert!(lines[1].ends_with(",-42.00,\"обед, кофе\",Еда вне дома"));
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_last_with_empty_ledger() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;

        let reply = router.handle_message_at(&message("/clear_last"), test_now()).await;
        assert_eq!(reply, Reply::plain("Нет транзакций для удаления."));
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_last_removes_newest_row() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::answering("Транспорт")).await?;
        let db = router.database();
        router.handle_message_at(&message("1000 зарплата"), test_now()).await;
        router.handle_message_at(&message("-250 такси"), test_now()).await;

        let reply = router.handle_message_at(&message("/clearlast"), test_now()).await;
        let text = body(&reply);
        assert!(text.starts_with("✅ Последняя транзакция удалена"));
        assert!(text.contains("Сумма: -250.00"));
        assert!(text.contains("Комментарий: такси"));
        assert!(text.contains("Категория: Транспорт"));

        let rows = ledger::all_transactions(db, OWNER).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comment, "зарплата");
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_today_keeps_yesterday() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;
        let db = router.database();
        let yesterday = test_now() - chrono::TimeDelta::days(1);
        for amount in [-10.0, -20.0, 30.0] {
            insert_test_transaction(db, OWNER, amount, test_now()).await?;
        }
        let old = insert_test_transaction(db, OWNER, -40.0, yesterday).await?;

        let reply = router.handle_message_at(&message("/clear_today"), test_now()).await;
        assert_eq!(reply, Reply::plain("✅ Удалено 3 транзакций за сегодня."));
        assert_eq!(ledger::all_transactions(db, OWNER).await?, vec![old]);

        let reply = router.handle_message_at(&message("/cleartoday"), test_now()).await;
        assert_eq!(
            reply,
            Reply::plain("За сегодня не найдено транзакций для удаления.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_save_failure_sends_generic_error() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_errors([DbErr::Custom("database is locked".to_string())])
            .append_query_errors([DbErr::Custom("database is locked".to_string())])
            .into_connection();
        let router = Router::new(
            db,
            Arc::new(FakeClassifier::failing()),
            Arc::new(AppConfig::default()),
        );

        let reply = router.handle_message_at(&message("1500"), test_now()).await;
        assert_eq!(reply, Reply::plain(SAVE_FAILED));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_failure_is_not_reported_as_empty() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Custom("disk I/O error".to_string())])
            .into_connection();
        let router = Router::new(
            db,
            Arc::new(FakeClassifier::failing()),
            Arc::new(AppConfig::default()),
        );

        let reply = router.dispatch_at(OWNER, Command::ClearLast, test_now()).await;
        assert_eq!(
            reply,
            Reply::plain("Произошла ошибка при удалении последней транзакции.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_owners_do_not_see_each_other() -> Result<()> {
        let (router, _fake) = setup_router(FakeClassifier::failing()).await?;
        let db = router.database();
        insert_test_transaction(db, OWNER + 1, -10.0, test_now()).await?;

        let reply = router.dispatch_at(OWNER, Command::ClearLast, test_now()).await;
        assert_eq!(reply, Reply::plain("Нет транзакций для удаления."));
        assert_eq!(ledger::all_transactions(db, OWNER + 1).await?.len(), 1);
        Ok(())
    }
}
