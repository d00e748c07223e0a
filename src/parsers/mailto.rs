//! E-mail drafts: `mailto:` URIs and the `MATMSG:` QR form.

use super::grammar::EscapedFields;
use super::{percent_decode, split_list, strip_prefix_ignore_case, uri_query_pairs};
use crate::payload::{EmailMessage, Field, ParsedPayload, PayloadData};

/// Parses a `mailto:` or `MATMSG:` draft, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let trimmed = text.trim();
    let message = if let Some(rest) = strip_prefix_ignore_case(trimmed, "mailto:") {
        parse_mailto(rest)
    } else if let Some(rest) = strip_prefix_ignore_case(trimmed, "MATMSG:") {
        parse_matmsg(rest)
    } else {
        return None;
    };

    Some(build_payload(text, message))
}

fn parse_mailto(rest: &str) -> EmailMessage {
    let (recipients, query) = match rest.split_once('?') {
        Some((recipients, query)) => (recipients, query),
        None => (rest, ""),
    };

    let mut message = EmailMessage {
        to: split_list(&percent_decode(recipients)),
        cc: Vec::new(),
        bcc: Vec::new(),
        subject: None,
        body: None,
    };

    for (key, value) in uri_query_pairs(query) {
        match key.as_str() {
            "to" => message.to.extend(split_list(&value)),
            "cc" => message.cc.extend(split_list(&value)),
            "bcc" => message.bcc.extend(split_list(&value)),
            "subject" if message.subject.is_none() && !value.is_empty() => {
                message.subject = Some(value)
            }
            "body" if message.body.is_none() && !value.is_empty() => message.body = Some(value),
            _ => {}
        }
    }

    message
}

fn parse_matmsg(rest: &str) -> EmailMessage {
    let fields = EscapedFields::parse(rest);
    EmailMessage {
        to: fields
            .get_all("TO")
            .iter()
            .flat_map(|v| split_list(v))
            .collect(),
        cc: Vec::new(),
        bcc: Vec::new(),
        subject: fields.get_nonempty("SUB"),
        body: fields.get_nonempty("BODY"),
    }
}

fn build_payload(text: &str, message: EmailMessage) -> ParsedPayload {
    let mut fields = Vec::new();
    if !message.to.is_empty() {
        fields.push(Field::new("To", message.to.join(", ")));
    }
    if !message.cc.is_empty() {
        fields.push(Field::new("Cc", message.cc.join(", ")));
    }
    if !message.bcc.is_empty() {
        fields.push(Field::new("Bcc", message.bcc.join(", ")));
    }
    if let Some(subject) = &message.subject {
        fields.push(Field::new("Subject", subject.clone()));
    }
    if let Some(body) = &message.body {
        fields.push(Field::new("Body", body.clone()));
    }

    let summary = match (message.to.first(), &message.subject) {
        (Some(to), Some(subject)) => format!("Email to {to}: {subject}"),
        (Some(to), None) => format!("Email to {to}"),
        (None, Some(subject)) => format!("Email: {subject}"),
        (None, None) => "Email".to_string(),
    };

    ParsedPayload::new(text, "Email", summary, fields, PayloadData::Email(message))
}
