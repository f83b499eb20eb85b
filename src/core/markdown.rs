//! Escaping for the chat platform's rich-text dialect.
//!
//! Every character below is prefixed with a backslash. Discord renders a backslash
//! followed by any ASCII punctuation as the bare character, so the set is safe to apply
//! to all user-supplied text and formatted numbers.

const SPECIAL: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
    '!',
];

/// Escapes every markup-significant character in `text`.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wraps already-escaped text in bold markers.
#[must_use]
pub fn bold(escaped: &str) -> String {
    format!("**{escaped}**")
}
