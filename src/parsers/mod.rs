//! Format recognisers.
//!
//! Each parser tests its own recognition predicate and returns `None`
//! for text it does not own. Declining is never an error; only the
//! `otpauth://` parser validates strictly once its scheme matches.

pub mod geo;
pub mod grammar;
pub mod ical;
pub mod mailto;
pub mod mecard;
pub mod otpauth;
pub mod sms;
pub mod text;
pub mod url;
pub mod vcard;
pub mod wifi;

use crate::payload::{Contact, Field, ParsedPayload};
use percent_encoding::percent_decode_str;

/// A recogniser: `Some` when the text belongs to this format.
pub type Recognizer = fn(&str) -> Option<ParsedPayload>;

/// Recognisers tried after `otpauth:`, in priority order. The first
/// match wins.
pub const RECOGNIZERS: [(&str, Recognizer); 8] = [
    ("wifi", wifi::parse),
    ("mecard", mecard::parse),
    ("vcard", vcard::parse),
    ("vevent", ical::parse),
    ("geo", geo::parse),
    ("mailto", mailto::parse),
    ("sms", sms::parse),
    ("url", url::parse),
];

/// ASCII case-insensitive `strip_prefix`.
pub(crate) fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

pub(crate) fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Comma-separated list, trimmed, empties dropped.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// `a=b&c=d` pairs, percent-decoded, keys lower-cased. `+` is kept
/// literal since it is common in addresses and phone numbers.
pub(crate) fn uri_query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key).to_ascii_lowercase(), percent_decode(value))
        })
        .collect()
}

pub(crate) fn contact_summary(contact: &Contact) -> String {
    contact
        .name
        .clone()
        .or_else(|| contact.organization.clone())
        .or_else(|| contact.emails.first().cloned())
        .or_else(|| contact.phones.first().cloned())
        .unwrap_or_else(|| "Contact card".to_string())
}

pub(crate) fn contact_fields(contact: &Contact) -> Vec<Field> {
    let mut fields = Vec::new();
    if let Some(name) = &contact.name {
        fields.push(Field::new("Name", name.clone()));
    }
    if let Some(org) = &contact.organization {
        fields.push(Field::new("Organization", org.clone()));
    }
    if let Some(title) = &contact.title {
        fields.push(Field::new("Title", title.clone()));
    }
    fields.extend(contact.phones.iter().map(|p| Field::new("Phone", p.clone())));
    fields.extend(contact.emails.iter().map(|e| Field::new("Email", e.clone())));
    fields.extend(contact.addresses.iter().map(|a| Field::new("Address", a.clone())));
    fields.extend(contact.urls.iter().map(|u| Field::new("Website", u.clone())));
    if let Some(note) = &contact.note {
        fields.push(Field::new("Note", note.clone()));
    }
    fields
}
