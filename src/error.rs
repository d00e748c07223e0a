//! Classification errors.
//!
//! These are returned as values and their `Display` output is meant to
//! be shown to the user as-is. An unrecognised format is not an error;
//! such text is classified as plain text.

use thiserror::Error;

/// Errors produced by the payload classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty after trimming.
    #[error("nothing to parse: the payload is empty")]
    PayloadEmpty,
    /// An `otpauth://` link failed validation.
    #[error(transparent)]
    Otp(#[from] OtpValidationError),
}

/// Strict validation failures for `otpauth://` links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpValidationError {
    /// The authority is neither `totp` nor `hotp`.
    #[error("unsupported OTP type: {0}")]
    UnsupportedOtpType(String),
    /// `secret` is absent or blank.
    #[error("missing secret")]
    MissingSecret,
    /// `algorithm` is not SHA1, SHA256 or SHA512.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// `digits` is not an integer within the policy bounds.
    #[error("digits must be an integer between {min} and {max}")]
    InvalidDigits {
        /// Smallest accepted digit count.
        min: u8,
        /// Largest accepted digit count.
        max: u8,
    },
    /// `period` is not a positive integer within the policy bound.
    #[error("period must be a positive integer no greater than {max}")]
    InvalidPeriod {
        /// Largest accepted period in seconds.
        max: u32,
    },
    /// `counter` is not a non-negative integer.
    #[error("counter must be a non-negative integer")]
    InvalidCounter,
}
