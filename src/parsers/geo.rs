//! `geo:<lat>,<lng>[,<alt>][?q=<query>]` locations.
//!
//! Malformed coordinates make the parser decline rather than fail, since
//! such text may just be ordinary prose.

use super::strip_prefix_ignore_case;
use crate::payload::{Field, GeoPoint, ParsedPayload, PayloadData};

/// Parses a `geo:` URI, or declines.
pub fn parse(text: &str) -> Option<ParsedPayload> {
    let body = strip_prefix_ignore_case(text.trim(), "geo:")?;
    let (coordinates, query) = match body.split_once('?') {
        Some((coordinates, query)) => (coordinates, Some(query)),
        None => (body, None),
    };

    // RFC 5870 parameters (`;crs=`, `;u=`) follow the coordinates.
    let coordinates = coordinates.split(';').next().unwrap_or_default();
    let mut parts = coordinates.split(',');
    let latitude = parse_coordinate(parts.next()?)?;
    let longitude = parse_coordinate(parts.next()?)?;
    let altitude = match parts.next() {
        Some(raw) => Some(parse_coordinate(raw)?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    let query = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    });

    let point = GeoPoint {
        latitude,
        longitude,
        altitude,
        query,
    };

    let mut fields = vec![
        Field::new("Latitude", point.latitude.to_string()),
        Field::new("Longitude", point.longitude.to_string()),
    ];
    if let Some(altitude) = point.altitude {
        fields.push(Field::new("Altitude", format!("{altitude} m")));
    }
    if let Some(query) = &point.query {
        fields.push(Field::new("Query", query.clone()));
    }

    let summary = match &point.query {
        Some(query) => format!("{} ({}, {})", query, point.latitude, point.longitude),
        None => format!("{}, {}", point.latitude, point.longitude),
    };

    Some(ParsedPayload::new(
        text,
        "Location",
        summary,
        fields,
        PayloadData::Geo(point),
    ))
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
