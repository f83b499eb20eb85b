//! Free-text transaction parsing.
//!
//! A transaction message starts with a signed decimal literal (`-?\d+(\.\d+)?`,
//! ASCII digits only) and continues with an optional comment, e.g. `-500 кофе`.

use tracing::error;

/// Amount and comment extracted from a message
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    /// Signed amount; positive is income, negative is an expense
    pub amount: f64,
    /// Remainder of the message with surrounding whitespace trimmed
    pub comment: String,
}

/// Length in bytes of the decimal literal anchored at the start of `text`, if any.
fn leading_literal_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = usize::from(bytes.first() == Some(&b'-'));

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    if pos == int_start {
        return None;
    }

    // A fraction only counts when at least one digit follows the dot
    if bytes.get(pos) == Some(&b'.') && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) {
        pos += 1;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
    }

    Some(pos)
}

/// Parses a message into an amount and a comment.
///
/// Returns `None` when the message does not start with a number; callers answer with a
/// usage hint in that case.
#[must_use]
pub fn parse_entry(text: &str) -> Option<ParsedEntry> {
    let len = leading_literal_len(text)?;
    let (literal, rest) = text.split_at(len);

    match literal.parse::<f64>() {
        Ok(amount) => Some(ParsedEntry {
            amount,
            comment: rest.trim().to_string(),
        }),
        Err(e) => {
            error!(literal, "Matched amount literal failed to parse: {}", e);
            None
        }
    }
}
