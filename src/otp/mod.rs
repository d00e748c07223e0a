//! One-time password engine.
//!
//! Decodes base32 secrets, computes HMAC-based codes (HOTP/TOTP) and
//! defines the parameter record produced by the `otpauth://` parser.

pub mod base32;
mod engine;
mod params;

pub use self::base32::Base32DecodeError;
pub use engine::{generate_code, hotp_at_counter, seconds_remaining, time_step, OtpError};
pub use params::{Algorithm, OtpKind, OtpParameters, OtpPolicy, OtpType};
