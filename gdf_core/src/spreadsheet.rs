//! Reads the CSV export of the schedule table.
//!
//! The required columns match the table the parish office exports:
//! `Startdatum`, `Titel`, `Standortnamen`, `Mitwirkender`, `Gemeinden`.
//! A missing column aborts the run with an error naming every missing field;
//! a row with an unparseable `Startdatum` is kept with `start: None` and
//! silently dropped by the aggregator.

use std::{fs::File, io::Read, path::Path};

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::{Europe::Berlin, Tz};

use crate::boyens::normalize_ws;
use crate::error::{GdfError, Result};
use crate::event::ServiceRecord;

pub static REQUIRED_COLUMNS: &[&str] = &[
    "Startdatum",
    "Titel",
    "Standortnamen",
    "Mitwirkender",
    "Gemeinden",
];

/// Accepted `Startdatum` spellings, interpreted as Europe/Berlin wall-clock
/// time. RFC 3339 timestamps (the `Z` form) are converted instead.
static DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<ServiceRecord>> {
    read_records(File::open(path)?)
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<ServiceRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut indices = Vec::new();
    let mut missing = Vec::new();
    for column in REQUIRED_COLUMNS {
        match headers.iter().position(|header| header.trim() == *column) {
            Some(index) => indices.push(index),
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(GdfError::MissingColumns { columns: missing });
    }
    let [start_index, title_index, location_index, contributor_index, parish_index] = indices[..]
    else {
        unreachable!("one index per required column");
    };

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let field = |index: usize| normalize_ws(row.get(index).unwrap_or(""));
        let raw_start = field(start_index);
        let start = parse_start(&raw_start);
        if start.is_none() && !raw_start.is_empty() {
            tracing::debug!(value = %raw_start, "unparseable Startdatum");
        }
        records.push(ServiceRecord {
            start,
            title: field(title_index),
            location: field(location_index),
            contributor: field(contributor_index),
            parish: field(parish_index),
        });
    }
    Ok(records)
}

fn parse_start(raw: &str) -> Option<DateTime<Tz>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Berlin));
    }
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .and_then(|naive| naive.and_local_timezone(Berlin).earliest())
    })
}
