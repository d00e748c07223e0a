//! Fallback for text no other parser recognises.

use crate::payload::{ParsedPayload, PayloadData, PlainText};

/// Longest summary, in characters.
pub const SUMMARY_LIMIT: usize = 140;

/// Wraps any text as a plain-text payload.
pub fn parse(text: &str) -> ParsedPayload {
    let first_line = text.trim().lines().next().unwrap_or_default().trim();
    let summary: String = first_line.chars().take(SUMMARY_LIMIT).collect();

    ParsedPayload::new(
        text,
        "Text",
        summary,
        Vec::new(),
        PayloadData::Text(PlainText {
            text: text.to_string(),
        }),
    )
}
