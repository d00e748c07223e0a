//! OTP enrollment parameters and validation policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OTP flavour named in the URI authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OtpType {
    /// Time-based (RFC 6238).
    Totp,
    /// Counter-based (RFC 4226).
    Hotp,
}

impl fmt::Display for OtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpType::Totp => f.write_str("TOTP"),
            OtpType::Hotp => f.write_str("HOTP"),
        }
    }
}

/// HMAC hash function used by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    /// HMAC-SHA1, the default.
    #[default]
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl Algorithm {
    /// Parses an upper-cased algorithm name as it appears in URIs.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SHA1" => Some(Algorithm::Sha1),
            "SHA256" => Some(Algorithm::Sha256),
            "SHA512" => Some(Algorithm::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Sha1 => f.write_str("SHA1"),
            Algorithm::Sha256 => f.write_str("SHA256"),
            Algorithm::Sha512 => f.write_str("SHA512"),
        }
    }
}

/// Moving factor: a TOTP period or an HOTP counter, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum OtpKind {
    /// Time-based with a step in seconds.
    Totp {
        /// Time step in seconds.
        period: u32,
    },
    /// Counter-based.
    Hotp {
        /// Moving counter value.
        counter: u64,
    },
}

/// Parameters extracted from an `otpauth://` link.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpParameters {
    /// TOTP period or HOTP counter.
    pub kind: OtpKind,
    /// Account label, percent-decoded.
    pub label: String,
    /// `issuer` parameter, else the label prefix before `:`.
    pub issuer: Option<String>,
    /// Uppercase base32 secret with whitespace removed.
    pub secret_b32: String,
    /// HMAC hash function.
    pub algorithm: Algorithm,
    /// Code length.
    pub digits: u8,
    /// The URI exactly as scanned, for re-export.
    pub original: String,
}

impl OtpParameters {
    /// Returns the OTP flavour.
    pub fn otp_type(&self) -> OtpType {
        match self.kind {
            OtpKind::Totp { .. } => OtpType::Totp,
            OtpKind::Hotp { .. } => OtpType::Hotp,
        }
    }

    /// TOTP period in seconds, `None` for HOTP.
    pub fn period(&self) -> Option<u32> {
        match self.kind {
            OtpKind::Totp { period } => Some(period),
            OtpKind::Hotp { .. } => None,
        }
    }

    /// HOTP counter, `None` for TOTP.
    pub fn counter(&self) -> Option<u64> {
        match self.kind {
            OtpKind::Totp { .. } => None,
            OtpKind::Hotp { counter } => Some(counter),
        }
    }

    /// Bullet mask for display, capped at 24 symbols.
    pub fn masked_secret(&self) -> String {
        "•".repeat(self.secret_b32.chars().count().min(24))
    }
}

// The secret never appears in debug output.
impl fmt::Debug for OtpParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpParameters")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("digits", &self.digits)
            .finish_non_exhaustive()
    }
}

/// Acceptance bounds applied when validating OTP links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpPolicy {
    /// Smallest accepted `digits`.
    pub min_digits: u8,
    /// Largest accepted `digits`.
    pub max_digits: u8,
    /// Largest accepted TOTP period in seconds.
    pub max_period: u32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            min_digits: 4,
            max_digits: 10,
            max_period: 86_400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: OtpKind) -> OtpParameters {
        OtpParameters {
            kind,
            label: "alice@example.com".into(),
            issuer: Some("Example".into()),
            secret_b32: "JBSWY3DPEHPK3PXP".into(),
            algorithm: Algorithm::Sha1,
            digits: 6,
            original: "otpauth://totp/alice@example.com?secret=JBSWY3DPEHPK3PXP".into(),
        }
    }

    #[test]
    fn test_kind_accessors_are_exclusive() {
        let totp = sample(OtpKind::Totp { period: 30 });
        assert_eq!(totp.otp_type(), OtpType::Totp);
        assert_eq!(totp.period(), Some(30));
        assert_eq!(totp.counter(), None);

        let hotp = sample(OtpKind::Hotp { counter: 7 });
        assert_eq!(hotp.otp_type(), OtpType::Hotp);
        assert_eq!(hotp.period(), None);
        assert_eq!(hotp.counter(), Some(7));
    }

    #[test]
    fn test_masked_secret_caps_length() {
        let mut params = sample(OtpKind::Totp { period: 30 });
        assert_eq!(params.masked_secret().chars().count(), 16);

        params.secret_b32 = "A".repeat(40);
        assert_eq!(params.masked_secret().chars().count(), 24);
    }

    #[test]
    fn test_debug_hides_secret() {
        let params = sample(OtpKind::Totp { period: 30 });
        let rendered = format!("{:?}", params);
        assert!(!rendered.contains("JBSWY3DPEHPK3PXP"));
        assert!(rendered.contains("alice@example.com"));
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(Algorithm::from_name("SHA256"), Some(Algorithm::Sha256));
        assert_eq!(Algorithm::from_name("MD5"), None);
        assert_eq!(Algorithm::Sha512.to_string(), "SHA512");
    }
}
