//! Text messages: `sms:<n1,n2>?body=..` and `SMSTO:<number>:<body>`.

use super::{percent_decode, split_list, strip_prefix_ignore_case, uri_query_pairs};
use crate::payload::{Field, ParsedPayload, PayloadData, SmsMessage};

/// Parses an `sms:` or `SMSTO:` message, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let trimmed = text.trim();
    let message = if let Some(rest) = strip_prefix_ignore_case(trimmed, "smsto:") {
        let (number, body) = rest.split_once(':').unwrap_or((rest, ""));
        SmsMessage {
            recipients: split_list(number),
            body: Some(body.to_string()).filter(|b| !b.trim().is_empty()),
        }
    } else if let Some(rest) = strip_prefix_ignore_case(trimmed, "sms:") {
        let (numbers, query) = rest.split_once('?').unwrap_or((rest, ""));
        let body = uri_query_pairs(query)
            .into_iter()
            .find(|(k, v)| k == "body" && !v.is_empty())
            .map(|(_, v)| v);
        SmsMessage {
            recipients: split_list(&percent_decode(numbers)),
            body,
        }
    } else {
        return None;
    };

    let mut fields = Vec::new();
    if !message.recipients.is_empty() {
        fields.push(Field::new("To", message.recipients.join(", ")));
    }
    if let Some(body) = &message.body {
        fields.push(Field::new("Message", body.clone()));
    }

    let summary = match message.recipients.first() {
        Some(to) => format!("SMS to {to}"),
        None => "SMS".to_string(),
    };

    Some(ParsedPayload::new(
        text,
        "Text message",
        summary,
        fields,
        PayloadData::Sms(message),
    ))
}
