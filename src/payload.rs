//! Structured payloads produced by the classifier.

use crate::otp::OtpParameters;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Payload family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PayloadFormat {
    /// `otpauth://` enrollment link.
    Otp,
    /// WiFi network credentials.
    Wifi,
    /// MeCard or vCard contact.
    Contact,
    /// iCalendar event.
    CalendarEvent,
    /// `geo:` location.
    Geo,
    /// E-mail draft.
    Email,
    /// Text message draft.
    Sms,
    /// Web link.
    Url,
    /// Anything else.
    Text,
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadFormat::Otp => "OTP",
            PayloadFormat::Wifi => "WiFi",
            PayloadFormat::Contact => "Contact",
            PayloadFormat::CalendarEvent => "Calendar event",
            PayloadFormat::Geo => "Geo",
            PayloadFormat::Email => "Email",
            PayloadFormat::Sms => "SMS",
            PayloadFormat::Url => "URL",
            PayloadFormat::Text => "Text",
        };
        f.write_str(name)
    }
}

/// A label/value pair for generic display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Display label, e.g. `Phone`.
    pub label: String,
    /// Display value.
    pub value: String,
}

impl Field {
    /// Creates a field.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Credentials from a `WIFI:` code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiNetwork {
    /// Network name, unescaped. Empty when `S:` is missing.
    pub ssid: String,
    /// Authentication type as written (`WPA`, `WEP`, `nopass`, ...).
    pub security: Option<String>,
    /// Passphrase, `None` when absent or empty.
    pub password: Option<String>,
    /// `H:true` was given.
    pub hidden: bool,
}

/// Which card encoding a contact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactSource {
    /// `MECARD:` text.
    MeCard,
    /// `BEGIN:VCARD` block.
    VCard,
}

/// Contact card fields. Multi-valued properties keep their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// Card encoding.
    pub source: ContactSource,
    /// Display name.
    pub name: Option<String>,
    /// Organization.
    pub organization: Option<String>,
    /// Job title.
    pub title: Option<String>,
    /// Phone numbers.
    pub phones: Vec<String>,
    /// E-mail addresses.
    pub emails: Vec<String>,
    /// Postal addresses.
    pub addresses: Vec<String>,
    /// Websites.
    pub urls: Vec<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// An iCalendar date or date-time as written, plus its parsed form when
/// it uses one of the basic formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTime {
    /// Value as it appeared in the event.
    pub raw: String,
    /// Parsed value; dates get midnight.
    pub parsed: Option<NaiveDateTime>,
    /// Trailing `Z` was present on a parsed value.
    pub utc: bool,
}

/// Fields of a `VEVENT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// `SUMMARY`.
    pub summary: Option<String>,
    /// `LOCATION`.
    pub location: Option<String>,
    /// `DTSTART`.
    pub start: Option<EventTime>,
    /// `DTEND`.
    pub end: Option<EventTime>,
    /// `DESCRIPTION`.
    pub description: Option<String>,
}

/// Coordinates from a `geo:` URI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Metres, when given.
    pub altitude: Option<f64>,
    /// Decoded `q=` search text.
    pub query: Option<String>,
}

/// A `mailto:` or `MATMSG:` draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Message body.
    pub body: Option<String>,
}

/// An `sms:` or `SMSTO:` draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    /// Phone numbers.
    pub recipients: Vec<String>,
    /// Message body.
    pub body: Option<String>,
}

/// A web link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebLink {
    /// Normalized absolute URL (`www.` links get `https://`).
    pub url: String,
    /// Host name.
    pub host: Option<String>,
}

/// Unrecognised text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlainText {
    /// The scanned text.
    pub text: String,
}

/// Format-specific record; the variant determines the payload format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum PayloadData {
    /// See [`OtpParameters`].
    Otp(OtpParameters),
    /// See [`WifiNetwork`].
    Wifi(WifiNetwork),
    /// See [`Contact`].
    Contact(Contact),
    /// See [`CalendarEvent`].
    CalendarEvent(CalendarEvent),
    /// See [`GeoPoint`].
    Geo(GeoPoint),
    /// See [`EmailMessage`].
    Email(EmailMessage),
    /// See [`SmsMessage`].
    Sms(SmsMessage),
    /// See [`WebLink`].
    Url(WebLink),
    /// See [`PlainText`].
    Text(PlainText),
}

impl PayloadData {
    /// Returns the family of this record.
    pub fn format(&self) -> PayloadFormat {
        match self {
            PayloadData::Otp(_) => PayloadFormat::Otp,
            PayloadData::Wifi(_) => PayloadFormat::Wifi,
            PayloadData::Contact(_) => PayloadFormat::Contact,
            PayloadData::CalendarEvent(_) => PayloadFormat::CalendarEvent,
            PayloadData::Geo(_) => PayloadFormat::Geo,
            PayloadData::Email(_) => PayloadFormat::Email,
            PayloadData::Sms(_) => PayloadFormat::Sms,
            PayloadData::Url(_) => PayloadFormat::Url,
            PayloadData::Text(_) => PayloadFormat::Text,
        }
    }
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPayload {
    raw: String,
    title: String,
    summary: String,
    fields: Vec<Field>,
    data: PayloadData,
}

impl ParsedPayload {
    /// Assembles a payload.
    pub fn new(
        raw: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        fields: Vec<Field>,
        data: PayloadData,
    ) -> Self {
        Self {
            raw: raw.into(),
            title: title.into(),
            summary: summary.into(),
            fields,
            data,
        }
    }

    /// Returns the payload family.
    pub fn format(&self) -> PayloadFormat {
        self.data.format()
    }

    /// The text exactly as it was classified.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Short heading.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Human-readable one-liner.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Label/value pairs for display.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The typed record.
    pub fn data(&self) -> &PayloadData {
        &self.data
    }

    /// OTP parameters, when this is an OTP payload.
    pub fn otp(&self) -> Option<&OtpParameters> {
        match &self.data {
            PayloadData::Otp(params) => Some(params),
            _ => None,
        }
    }
}
