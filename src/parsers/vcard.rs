//! vCard contacts (`BEGIN:VCARD` ... `END:VCARD`).

use super::grammar::{component_lines, ContentLine};
use super::{contact_fields, contact_summary};
use crate::payload::{Contact, ContactSource, ParsedPayload, PayloadData};

/// Parses a vCard, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let lines = component_lines(text, "VCARD")?;

    let first = |name: &str| -> Option<String> {
        lines
            .iter()
            .filter(|l| l.is(name))
            .map(ContentLine::text)
            .find(|v| !v.is_empty())
    };
    let all = |name: &str, render: fn(&ContentLine) -> String| -> Vec<String> {
        lines
            .iter()
            .filter(|l| l.is(name))
            .map(render)
            .filter(|v| !v.is_empty())
            .collect()
    };

    let name = first("FN").or_else(|| {
        lines
            .iter()
            .find(|l| l.is("N"))
            .and_then(|l| structured_name(&l.value))
    });

    let contact = Contact {
        source: ContactSource::VCard,
        name,
        organization: lines
            .iter()
            .find(|l| l.is("ORG"))
            .map(|l| join_components(&l.value, " "))
            .filter(|v| !v.is_empty()),
        title: first("TITLE"),
        phones: all("TEL", strip_uri_scheme),
        emails: all("EMAIL", ContentLine::text),
        addresses: all("ADR", |l| join_components(&l.value, ", ")),
        urls: all("URL", ContentLine::text),
        note: first("NOTE"),
    };

    Some(ParsedPayload::new(
        text,
        "Contact",
        contact_summary(&contact),
        contact_fields(&contact),
        PayloadData::Contact(contact),
    ))
}

/// `N:Family;Given;Additional;Prefix;Suffix` rendered as display order.
fn structured_name(value: &str) -> Option<String> {
    let parts = split_components(value);
    let get = |i: usize| parts.get(i).map(String::as_str).unwrap_or("");
    let ordered = [get(3), get(1), get(2), get(0), get(4)];
    let name = ordered
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(name)
}

fn join_components(value: &str, separator: &str) -> String {
    split_components(value)
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn split_components(value: &str) -> Vec<String> {
    super::grammar::split_escaped(value, ';')
        .into_iter()
        .map(|p| p.trim().to_string())
        .collect()
}

/// vCard 4 writes phones as `tel:` URIs.
fn strip_uri_scheme(line: &ContentLine) -> String {
    let text = line.text();
    match text.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("tel:") => text[4..].trim().to_string(),
        _ => text,
    }
}
