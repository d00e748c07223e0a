//! `WIFI:S:<ssid>;T:<security>;P:<password>;H:<true|false>;;` network credentials.

use super::grammar::EscapedFields;
use super::strip_prefix_ignore_case;
use crate::payload::{Field, ParsedPayload, PayloadData, WifiNetwork};

/// Parses `WIFI:` credentials, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let body = strip_prefix_ignore_case(text, "WIFI:")?;
    let fields = EscapedFields::parse(body);

    let network = WifiNetwork {
        ssid: fields.get("S").unwrap_or_default().to_string(),
        security: fields.get_nonempty("T"),
        password: fields.get("P").filter(|p| !p.is_empty()).map(str::to_string),
        hidden: fields
            .get("H")
            .is_some_and(|h| h.trim().eq_ignore_ascii_case("true")),
    };

    let mut display = vec![Field::new("Network", network.ssid.clone())];
    display.push(Field::new(
        "Security",
        network.security.clone().unwrap_or_else(|| "None".to_string()),
    ));
    if let Some(password) = &network.password {
        display.push(Field::new("Password", password.clone()));
    }
    if network.hidden {
        display.push(Field::new("Hidden", "Yes"));
    }

    let summary = if network.ssid.is_empty() {
        "WiFi network".to_string()
    } else {
        format!("WiFi network {}", network.ssid)
    };

    Some(ParsedPayload::new(
        text,
        "WiFi network",
        summary,
        display,
        PayloadData::Wifi(network),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(text: &str) -> WifiNetwork {
        match parse(text).unwrap().data() {
            PayloadData::Wifi(network) => network.clone(),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_escaped_separators() {
        let net = network(r"WIFI:S:My\;Net;T:WPA;P:pass\\word;;");
        assert_eq!(net.ssid, "My;Net");
        assert_eq!(net.password.as_deref(), Some(r"pass\word"));
        assert_eq!(net.security.as_deref(), Some("WPA"));
        assert!(!net.hidden);
    }

    #[test]
    fn test_field_order_and_trailing_separator() {
        let net = network("wifi:H:true;P:secret;S:Cafe");
        assert_eq!(net.ssid, "Cafe");
        assert_eq!(net.password.as_deref(), Some("secret"));
        assert_eq!(net.security, None);
        assert!(net.hidden);
    }

    #[test]
    fn test_quote_and_comma_escapes() {
        let net = network(r#"WIFI:S:\"Home\,5G\";T:WEP;P:;;"#);
        assert_eq!(net.ssid, "\"Home,5G\"");
        assert_eq!(net.password, None);
    }

    #[test]
    fn test_password_not_shown_when_absent() {
        let payload = parse("WIFI:S:Open;T:nopass;;").unwrap();
        assert!(payload.fields().iter().all(|f| f.label != "Password"));
        assert_eq!(payload.summary(), "WiFi network Open");
    }

    #[test]
    fn test_declines_other_text() {
        assert!(parse("MECARD:N:Bob;;").is_none());
        assert!(parse("wif").is_none());
    }
}
