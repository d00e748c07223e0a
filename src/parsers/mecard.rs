//! `MECARD:N:<name>;ORG:..;TEL:..;EMAIL:..;ADR:..;NOTE:..;;` contact cards.

use super::grammar::EscapedFields;
use super::{contact_fields, contact_summary, strip_prefix_ignore_case};
use crate::payload::{Contact, ContactSource, ParsedPayload, PayloadData};

/// Parses a `MECARD:` contact, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let body = strip_prefix_ignore_case(text, "MECARD:")?;
    let fields = EscapedFields::parse(body);

    // MeCard names are written `Last,First`.
    let name = fields.get_nonempty("N").map(|n| match n.split_once(',') {
        Some((last, first)) if !first.trim().is_empty() => {
            format!("{} {}", first.trim(), last.trim())
        }
        _ => n.replace(',', " ").trim().to_string(),
    });

    let contact = Contact {
        source: ContactSource::MeCard,
        name,
        organization: fields.get_nonempty("ORG"),
        title: fields.get_nonempty("TITLE"),
        phones: fields.get_all("TEL"),
        emails: fields.get_all("EMAIL"),
        addresses: fields.get_all("ADR"),
        urls: fields.get_all("URL"),
        note: fields.get_nonempty("NOTE"),
    };

    Some(ParsedPayload::new(
        text,
        "Contact",
        contact_summary(&contact),
        contact_fields(&contact),
        PayloadData::Contact(contact),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(text: &str) -> Contact {
        match parse(text).unwrap().data() {
            PayloadData::Contact(contact) => contact.clone(),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_full_card() {
        let c = contact(
            r"MECARD:N:Doe,John;ORG:ACME\; Inc;TEL:+15551234;TEL:+15559876;EMAIL:john@example.com;ADR:1 Main St\, Springfield;NOTE:Met at expo;;",
        );
        assert_eq!(c.source, ContactSource::MeCard);
        assert_eq!(c.name.as_deref(), Some("John Doe"));
        assert_eq!(c.organization.as_deref(), Some("ACME; Inc"));
        assert_eq!(c.phones, vec!["+15551234", "+15559876"]);
        assert_eq!(c.emails, vec!["john@example.com"]);
        assert_eq!(c.addresses, vec!["1 Main St, Springfield"]);
        assert_eq!(c.note.as_deref(), Some("Met at expo"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let c = contact("mecard:N:Alice;X-FOO:bar;SOUND:ah;;");
        assert_eq!(c.name.as_deref(), Some("Alice"));
        assert!(c.phones.is_empty());
    }

    #[test]
    fn test_summary_and_fields() {
        let payload = parse("MECARD:N:Alice;TEL:123;;").unwrap();
        assert_eq!(payload.summary(), "Alice");
        assert!(payload
            .fields()
            .iter()
            .any(|f| f.label == "Phone" && f.value == "123"));
    }
}
