//! `otpauth://` enrollment links.
//!
//! Unlike the other parsers, recognition here is followed by strict
//! validation: once the scheme matches, malformed parameters are errors.

use crate::error::OtpValidationError;
use crate::otp::{Algorithm, OtpKind, OtpParameters, OtpPolicy, OtpType};
use crate::payload::{Field, ParsedPayload, PayloadData};
use percent_encoding::percent_decode_str;
use url::Url;

/// Scheme prefix, matched case-insensitively.
pub const SCHEME_PREFIX: &str = "otpauth:";

/// Case-insensitive scheme check.
pub fn recognizes(text: &str) -> bool {
    text.get(..SCHEME_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SCHEME_PREFIX))
}

/// Parses and validates an `otpauth://` link.
///
/// `digits`, `period` and `counter` must be plain decimal integers, so
/// `digits=6.5` is rejected instead of being truncated to 6.
pub fn parse(text: &str, policy: &OtpPolicy) -> Result<ParsedPayload, OtpValidationError> {
    let url = Url::parse(text)
        .map_err(|_| OtpValidationError::UnsupportedOtpType("unknown".to_string()))?;

    let authority = url.host_str().unwrap_or_default().to_ascii_uppercase();
    let otp_type = match authority.as_str() {
        "TOTP" => OtpType::Totp,
        "HOTP" => OtpType::Hotp,
        "" => return Err(OtpValidationError::UnsupportedOtpType("unknown".to_string())),
        _ => return Err(OtpValidationError::UnsupportedOtpType(authority)),
    };

    let path = url.path();
    let label = percent_decode_str(path.strip_prefix('/').unwrap_or(path))
        .decode_utf8_lossy()
        .into_owned();

    // First occurrence wins; empty values count as absent.
    let param = |name: &str| -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    let secret_b32: String = param("secret")
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if secret_b32.is_empty() {
        return Err(OtpValidationError::MissingSecret);
    }

    let algorithm_name = param("algorithm")
        .unwrap_or_else(|| "SHA1".to_string())
        .to_uppercase();
    let algorithm = Algorithm::from_name(&algorithm_name)
        .ok_or(OtpValidationError::UnsupportedAlgorithm(algorithm_name))?;

    let invalid_digits = OtpValidationError::InvalidDigits {
        min: policy.min_digits,
        max: policy.max_digits,
    };
    let digits = match param("digits") {
        None => 6,
        Some(raw) => raw.trim().parse::<u8>().map_err(|_| invalid_digits.clone())?,
    };
    if digits < policy.min_digits || digits > policy.max_digits {
        return Err(invalid_digits);
    }

    let kind = match otp_type {
        OtpType::Totp => {
            let invalid = OtpValidationError::InvalidPeriod {
                max: policy.max_period,
            };
            let period = match param("period") {
                None => 30,
                Some(raw) => raw.trim().parse::<u32>().map_err(|_| invalid.clone())?,
            };
            if period == 0 || period > policy.max_period {
                return Err(invalid);
            }
            OtpKind::Totp { period }
        }
        OtpType::Hotp => {
            let counter = match param("counter") {
                None => 0,
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| OtpValidationError::InvalidCounter)?,
            };
            OtpKind::Hotp { counter }
        }
    };

    let issuer = param("issuer").or_else(|| {
        label
            .split_once(':')
            .map(|(prefix, _)| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
    });

    let params = OtpParameters {
        kind,
        label,
        issuer,
        secret_b32,
        algorithm,
        digits,
        original: text.to_string(),
    };

    tracing::debug!(
        otp_type = %otp_type,
        algorithm = %params.algorithm,
        digits = params.digits,
        "Parsed otpauth link"
    );

    Ok(build_payload(params))
}

fn build_payload(params: OtpParameters) -> ParsedPayload {
    let otp_type = params.otp_type();

    let mut fields = vec![Field::new("Type", otp_type.to_string())];
    if !params.label.is_empty() {
        fields.push(Field::new("Label", params.label.clone()));
    }
    if let Some(issuer) = &params.issuer {
        fields.push(Field::new("Issuer", issuer.clone()));
    }
    fields.push(Field::new("Algorithm", params.algorithm.to_string()));
    fields.push(Field::new("Digits", params.digits.to_string()));
    match params.kind {
        OtpKind::Totp { period } => fields.push(Field::new("Period", format!("{period}s"))),
        OtpKind::Hotp { counter } => fields.push(Field::new("Counter", counter.to_string())),
    }

    let title = params
        .issuer
        .clone()
        .unwrap_or_else(|| "One-time password".to_string());
    let summary = if params.label.is_empty() {
        format!("{otp_type} code")
    } else {
        format!("{otp_type} code for {}", params.label)
    };

    ParsedPayload::new(
        params.original.clone(),
        title,
        summary,
        fields,
        PayloadData::Otp(params),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PayloadFormat;

    fn parse_default(text: &str) -> Result<ParsedPayload, OtpValidationError> {
        parse(text, &OtpPolicy::default())
    }

    #[test]
    fn test_full_totp_link() {
        let uri = "otpauth://totp/Example:alice%40google.com?secret=jbsw y3dp ehpk3pxp&issuer=Example&algorithm=sha256&digits=8&period=60";
        let payload = parse_default(uri).unwrap();
        assert_eq!(payload.format(), PayloadFormat::Otp);
        assert_eq!(payload.raw(), uri);

        let otp = payload.otp().unwrap();
        assert_eq!(otp.label, "Example:alice@google.com");
        assert_eq!(otp.issuer.as_deref(), Some("Example"));
        assert_eq!(otp.secret_b32, "JBSWY3DPEHPK3PXP");
        assert_eq!(otp.algorithm, Algorithm::Sha256);
        assert_eq!(otp.digits, 8);
        assert_eq!(otp.kind, OtpKind::Totp { period: 60 });
        assert_eq!(otp.original, uri);
        assert!(!payload.fields().is_empty());
    }

    #[test]
    fn test_defaults_applied() {
        let otp = parse_default("otpauth://totp/x?secret=JBSWY3DPEHPK3PXP").unwrap();
        let otp = otp.otp().unwrap();
        assert_eq!(otp.algorithm, Algorithm::Sha1);
        assert_eq!(otp.digits, 6);
        assert_eq!(otp.kind, OtpKind::Totp { period: 30 });
        assert_eq!(otp.issuer, None);
    }

    #[test]
    fn test_hotp_counter() {
        let payload = parse_default("otpauth://HOTP/x?secret=ABC&counter=42").unwrap();
        assert_eq!(payload.otp().unwrap().kind, OtpKind::Hotp { counter: 42 });

        let payload = parse_default("otpauth://hotp/x?secret=ABC").unwrap();
        assert_eq!(payload.otp().unwrap().kind, OtpKind::Hotp { counter: 0 });
    }

    #[test]
    fn test_issuer_from_label_prefix() {
        let payload = parse_default("otpauth://totp/ACME%20Co:john?secret=ABC").unwrap();
        assert_eq!(payload.otp().unwrap().issuer.as_deref(), Some("ACME Co"));
        assert_eq!(payload.title(), "ACME Co");
    }

    #[test]
    fn test_unsupported_type() {
        assert_eq!(
            parse_default("otpauth://motp/x?secret=ABC").unwrap_err(),
            OtpValidationError::UnsupportedOtpType("MOTP".into())
        );
    }

    #[test]
    fn test_empty_secret_is_missing() {
        assert_eq!(
            parse_default("otpauth://totp/x?secret=").unwrap_err(),
            OtpValidationError::MissingSecret
        );
        assert_eq!(
            parse_default("otpauth://totp/x?issuer=A").unwrap_err(),
            OtpValidationError::MissingSecret
        );
    }

    #[test]
    fn test_unsupported_algorithm() {
        assert_eq!(
            parse_default("otpauth://totp/x?secret=ABC&algorithm=MD5").unwrap_err(),
            OtpValidationError::UnsupportedAlgorithm("MD5".into())
        );
    }

    #[test]
    fn test_invalid_digits() {
        for digits in ["20", "3", "abc", "-6", "6.5"] {
            let uri = format!("otpauth://totp/x?secret=ABC&digits={digits}");
            assert!(
                matches!(parse_default(&uri), Err(OtpValidationError::InvalidDigits { .. })),
                "digits={digits}"
            );
        }
        assert!(parse_default("otpauth://totp/x?secret=ABC&digits=4").is_ok());
        assert!(parse_default("otpauth://totp/x?secret=ABC&digits=10").is_ok());
    }

    #[test]
    fn test_invalid_period() {
        for period in ["0", "86401", "-30", "thirty", "30.5"] {
            let uri = format!("otpauth://totp/x?secret=ABC&period={period}");
            assert!(
                matches!(parse_default(&uri), Err(OtpValidationError::InvalidPeriod { .. })),
                "period={period}"
            );
        }
        assert!(parse_default("otpauth://totp/x?secret=ABC&period=86400").is_ok());
    }

    #[test]
    fn test_invalid_counter() {
        assert_eq!(
            parse_default("otpauth://hotp/x?secret=ABC&counter=-1").unwrap_err(),
            OtpValidationError::InvalidCounter
        );
        assert_eq!(
            parse_default("otpauth://hotp/x?secret=ABC&counter=1.0").unwrap_err(),
            OtpValidationError::InvalidCounter
        );
    }

    #[test]
    fn test_policy_is_configurable() {
        let policy = OtpPolicy {
            min_digits: 6,
            max_digits: 8,
            max_period: 120,
        };
        assert!(matches!(
            parse("otpauth://totp/x?secret=ABC&digits=4", &policy),
            Err(OtpValidationError::InvalidDigits { min: 6, max: 8 })
        ));
        assert!(matches!(
            parse("otpauth://totp/x?secret=ABC&period=300", &policy),
            Err(OtpValidationError::InvalidPeriod { max: 120 })
        ));
    }

    #[test]
    fn test_recognizes_case_insensitively() {
        assert!(recognizes("OTPAUTH://totp/x"));
        assert!(recognizes("otpauth://totp/x"));
        assert!(!recognizes("otp"));
        assert!(!recognizes("https://example.com"));
    }
}
