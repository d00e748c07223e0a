//! Web links (`http://`, `https://`, bare `www.`).

use super::strip_prefix_ignore_case;
use crate::payload::{Field, ParsedPayload, PayloadData, WebLink};
use url::Url;

/// Parses a web link, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let candidate = text.trim();
    if candidate.chars().any(char::is_whitespace) {
        return None;
    }

    let normalized = if strip_prefix_ignore_case(candidate, "http://").is_some()
        || strip_prefix_ignore_case(candidate, "https://").is_some()
    {
        candidate.to_string()
    } else if strip_prefix_ignore_case(candidate, "www.").is_some() {
        format!("https://{candidate}")
    } else {
        return None;
    };

    let url = Url::parse(&normalized).ok()?;
    let host = url.host_str()?.to_string();

    let link = WebLink {
        url: url.to_string(),
        host: Some(host),
    };

    let mut fields = vec![Field::new("URL", link.url.clone())];
    if let Some(host) = &link.host {
        fields.push(Field::new("Host", host.clone()));
    }
    let summary = link.host.clone().unwrap_or_else(|| link.url.clone());

    Some(ParsedPayload::new(
        text,
        "Link",
        summary,
        fields,
        PayloadData::Url(link),
    ))
}
