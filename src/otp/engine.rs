//! HOTP (RFC 4226) and TOTP (RFC 6238) code generation.
//!
//! The engine keeps no state between calls: a code is a pure function
//! of the parameters and the supplied timestamp.

use super::base32::{self, Base32DecodeError};
use super::params::{Algorithm, OtpKind, OtpParameters};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use thiserror::Error;

/// Errors raised while computing a code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    /// The stored secret does not decode.
    #[error("secret is not valid base32: {0}")]
    Base32Decode(#[from] Base32DecodeError),
}

/// Computes the code for `params` at `now`.
///
/// For HOTP parameters the timestamp is ignored and the stored counter
/// is used verbatim.
pub fn generate_code(params: &OtpParameters, now: DateTime<Utc>) -> Result<String, OtpError> {
    let key = base32::decode(&params.secret_b32)?;
    let counter = match params.kind {
        OtpKind::Totp { period } => time_step(now, period),
        OtpKind::Hotp { counter } => counter,
    };
    Ok(hotp_at_counter(&key, counter, params.digits, params.algorithm))
}

/// Computes an HOTP code from raw key bytes.
pub fn hotp_at_counter(key: &[u8], counter: u64, digits: u8, algorithm: Algorithm) -> String {
    let mac = compute_hmac(key, &counter.to_be_bytes(), algorithm);
    let code = u64::from(truncate(&mac)) % 10u64.saturating_pow(u32::from(digits));
    format!("{:0>width$}", code, width = usize::from(digits))
}

/// TOTP time step for `now`. Timestamps before the epoch map to step 0.
pub fn time_step(now: DateTime<Utc>, period: u32) -> u64 {
    let seconds = u64::try_from(now.timestamp()).unwrap_or(0);
    seconds / u64::from(period.max(1))
}

/// Seconds until the TOTP code for `now` rolls over.
pub fn seconds_remaining(now: DateTime<Utc>, period: u32) -> u32 {
    let period = u64::from(period.max(1));
    let seconds = u64::try_from(now.timestamp()).unwrap_or(0);
    (period - seconds % period) as u32
}

fn compute_hmac(key: &[u8], message: &[u8], algorithm: Algorithm) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha1 => {
            let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Dynamic truncation (RFC 4226 §5.3) to a 31-bit value.
fn truncate(mac: &[u8]) -> u32 {
    let offset = usize::from(mac[mac.len() - 1] & 0x0f);
    (u32::from(mac[offset] & 0x7f) << 24)
        | (u32::from(mac[offset + 1]) << 16)
        | (u32::from(mac[offset + 2]) << 8)
        | u32::from(mac[offset + 3])
}
