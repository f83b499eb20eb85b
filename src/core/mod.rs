//! Core business logic - framework-agnostic parsing, ledger, reporting and routing.

/// Category names and sentinels
pub mod category;
/// CSV export
pub mod export;
/// Persistence of transactions
pub mod ledger;
/// Per-owner write serialization
pub mod locks;
/// Rich-text escaping
pub mod markdown;
/// Message parsing into amount and comment
pub mod parser;
/// Calendar period boundaries
pub mod period;
/// Period reports
pub mod report;
/// Command and message routing
pub mod router;
