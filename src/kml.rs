//! KML parsing and generation.
//!
//! Parsing is regex-first: tracker exports vary wildly in namespaces and
//! nesting, and all we need are `<coordinates>` blocks and `<when>`
//! timestamps. Generation emits a KML 2.2 document with the route line,
//! one placemark per stop and the destination.

use std::sync::OnceLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::geo;

fn coordinates_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<coordinates[^>]*>(.*?)</coordinates>").expect("valid regex"))
}

fn when_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<when[^>]*>(.*?)</when>").expect("valid regex"))
}

fn tz_offset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[+-]\d{2}:\d{2}$").expect("valid regex"))
}

/// Extracts (lat, lng) pairs from every `<coordinates>` block.
///
/// Entries are whitespace-separated `lon,lat[,alt]` triples; pairs out
/// of coordinate range or unparseable are skipped.
pub fn extract_coordinates(content: &str) -> Vec<(f64, f64)> {
    let mut coordinates = Vec::new();

    for capture in coordinates_re().captures_iter(content) {
        for entry in capture[1].split_whitespace() {
            let mut parts = entry.split(',');
            let (Some(lon_raw), Some(lat_raw)) = (parts.next(), parts.next()) else {
                continue;
            };
            let (Ok(lon), Ok(lat)) = (lon_raw.parse::<f64>(), lat_raw.parse::<f64>()) else {
                continue;
            };
            if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
                coordinates.push((lat, lon));
            }
        }
    }

    coordinates
}

/// Travel time in minutes between the earliest and latest `<when>`
/// timestamps, or None when fewer than 2 parse.
pub fn travel_minutes(content: &str) -> Option<i64> {
    let mut timestamps: Vec<NaiveDateTime> = when_re()
        .captures_iter(content)
        .filter_map(|capture| parse_timestamp(capture[1].trim()))
        .collect();

    if timestamps.len() < 2 {
        return None;
    }
    timestamps.sort();

    let span = *timestamps.last()? - timestamps[0];
    Some((span.num_seconds() as f64 / 60.0).round() as i64)
}

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    // Timezone offsets are dropped: trackers mix local and UTC stamps
    // within one file and only the span matters.
    let cleaned = tz_offset_re().replace(raw, "");
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&cleaned, format).ok())
}

/// A stop as rendered into KML.
#[derive(Debug, Clone)]
pub struct KmlStop {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub order: usize,
    pub arrival: Option<NaiveTime>,
    pub passenger_count: usize,
}

/// The destination placemark.
#[derive(Debug, Clone)]
pub struct KmlDestination {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Renders a route as a KML 2.2 document: styled LineString for the
/// decoded polyline, a placemark per stop and the destination.
pub fn route_kml(
    route_name: &str,
    stops: &[KmlStop],
    destination: &KmlDestination,
    encoded_polyline: Option<&str>,
) -> String {
    let mut parts: Vec<String> = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#.to_string(),
        "<Document>".to_string(),
        format!("  <name>{}</name>", xml_escape(route_name)),
        "  <Style id=\"route_style\">".to_string(),
        "    <LineStyle><color>ffE82000</color><width>4</width></LineStyle>".to_string(),
        "  </Style>".to_string(),
        "  <Style id=\"stop_style\">".to_string(),
        "    <IconStyle><scale>1.2</scale>".to_string(),
        "      <Icon><href>http://maps.google.com/mapfiles/kml/paddle/blu-circle.png</href></Icon>"
            .to_string(),
        "    </IconStyle>".to_string(),
        "  </Style>".to_string(),
        "  <Style id=\"destination_style\">".to_string(),
        "    <IconStyle><scale>1.4</scale>".to_string(),
        "      <Icon><href>http://maps.google.com/mapfiles/kml/paddle/red-stars.png</href></Icon>"
            .to_string(),
        "    </IconStyle>".to_string(),
        "  </Style>".to_string(),
    ];

    if let Some(encoded) = encoded_polyline {
        let coords = geo::decode_polyline(encoded);
        let coords_str = coords
            .iter()
            .map(|(lat, lng)| format!("{},{},0", lng, lat))
            .collect::<Vec<_>>()
            .join(" ");
        parts.extend([
            "  <Placemark>".to_string(),
            format!("    <name>Route: {}</name>", xml_escape(route_name)),
            "    <styleUrl>#route_style</styleUrl>".to_string(),
            "    <LineString>".to_string(),
            "      <tessellate>1</tessellate>".to_string(),
            format!("      <coordinates>{}</coordinates>", coords_str),
            "    </LineString>".to_string(),
            "  </Placemark>".to_string(),
        ]);
    }

    parts.push("  <Folder>".to_string());
    parts.push("    <name>Stops</name>".to_string());
    for stop in stops {
        let time = stop
            .arrival
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        let description = format!(
            "Stop {}\nTime: {}\nPassengers: {}",
            stop.order, time, stop.passenger_count
        );
        parts.extend([
            "    <Placemark>".to_string(),
            format!("      <name>{}</name>", xml_escape(&stop.name)),
            format!("      <description>{}</description>", xml_escape(&description)),
            "      <styleUrl>#stop_style</styleUrl>".to_string(),
            format!(
                "      <Point><coordinates>{},{},0</coordinates></Point>",
                stop.lng, stop.lat
            ),
            "    </Placemark>".to_string(),
        ]);
    }
    parts.push("  </Folder>".to_string());

    parts.extend([
        "  <Placemark>".to_string(),
        format!(
            "    <name>Destination: {}</name>",
            xml_escape(&destination.address)
        ),
        "    <styleUrl>#destination_style</styleUrl>".to_string(),
        format!(
            "    <Point><coordinates>{},{},0</coordinates></Point>",
            destination.lng, destination.lat
        ),
        "  </Placemark>".to_string(),
        "</Document>".to_string(),
        "</kml>".to_string(),
    ]);

    parts.join("\n")
}

/// Escapes `&`, `<`, `>` and `"` for XML text content.
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
