//! Payload classification.
//!
//! Text is trimmed, then routed:
//!
//! ```text
//! otpauth: ──▶ strict OTP parser (errors surface)
//! otherwise ─▶ wifi → mecard → vcard → vevent → geo → mailto → sms → url
//!                                                                   │
//!                                                          plain text ◀┘
//! ```
//!
//! The first recogniser that claims the text wins. Unrecognised text is
//! never an error.

use crate::error::ParseError;
use crate::otp::OtpPolicy;
use crate::parsers::{otpauth, text, RECOGNIZERS};
use crate::payload::ParsedPayload;

/// Classifies `input` with the default OTP policy.
pub fn classify(input: &str) -> Result<ParsedPayload, ParseError> {
    classify_with(input, &OtpPolicy::default())
}

/// Classifies `input`, validating `otpauth://` links against `policy`.
pub fn classify_with(input: &str, policy: &OtpPolicy) -> Result<ParsedPayload, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::PayloadEmpty);
    }

    if otpauth::recognizes(trimmed) {
        let payload = otpauth::parse(trimmed, policy)?;
        tracing::debug!(format = %payload.format(), "Classified payload");
        return Ok(payload);
    }

    for (name, recognize) in RECOGNIZERS {
        if let Some(payload) = recognize(trimmed) {
            tracing::debug!(recognizer = name, format = %payload.format(), "Classified payload");
            return Ok(payload);
        }
    }

    tracing::debug!(len = trimmed.len(), "No format matched, using plain text");
    Ok(text::parse(trimmed))
}
