//! Formatting rules for the Boyens Medien bulletin format.
//!
//! The free-text classifiers are ordered rule tables evaluated top to bottom;
//! the first matching rule wins, so the table order carries the priority
//! semantics. All keyword matching is case-insensitive substring matching.

pub mod contributor;
pub mod date;
pub mod location;
pub mod service_type;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::event::{DayGroup, FormattedLine, ServiceRecord};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace and trim; the spreadsheet export and the API
/// both deliver free text with stray spaces.
pub fn normalize_ws(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Group records by calendar date, ascending, each group's lines sorted
/// ascending by start time. Records without a start date are skipped.
pub fn day_groups(records: &[ServiceRecord]) -> Vec<DayGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ServiceRecord>> = BTreeMap::new();
    for record in records {
        let Some(start) = record.start else {
            tracing::debug!(title = %record.title, "skipping record without start date");
            continue;
        };
        by_date.entry(start.date_naive()).or_default().push(record);
    }
    by_date
        .into_iter()
        .map(|(date, mut day_records)| {
            day_records.sort_by(|a, b| a.start.cmp(&b.start));
            DayGroup {
                date,
                heading: date::format_day(date),
                lines: day_records.into_iter().map(format_line).collect(),
            }
        })
        .collect()
}

/// Normalize a single record into a bulletin line. The dedicated location
/// field is preferred, the parish name is the fallback.
fn format_line(record: &ServiceRecord) -> FormattedLine {
    let raw_location = if record.location.is_empty() {
        &record.parish
    } else {
        &record.location
    };
    FormattedLine {
        location: location::resolve(raw_location),
        time: date::format_time(record.start),
        service_type: service_type::classify(&record.title),
        contributor: contributor::format(&record.contributor),
    }
}

/// Serialize the full bulletin: per date one heading line `"<date>:"`, one
/// line per record, then a blank line.
pub fn format_bulletin(records: &[ServiceRecord]) -> String {
    let mut output_lines = Vec::new();
    for group in day_groups(records) {
        output_lines.push(format!("{}:", group.heading));
        for line in &group.lines {
            output_lines.push(line.render());
        }
        output_lines.push(String::new());
    }
    output_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    use super::{format_bulletin, normalize_ws};
    use crate::event::ServiceRecord;

    fn record(
        start: (i32, u32, u32, u32, u32),
        title: &str,
        location: &str,
        contributor: &str,
        parish: &str,
    ) -> ServiceRecord {
        let (year, month, day, hour, minute) = start;
        ServiceRecord {
            start: Some(
                Berlin
                    .with_ymd_and_hms(year, month, day, hour, minute, 0)
                    .unwrap(),
            ),
            title: String::from(title),
            location: String::from(location),
            contributor: String::from(contributor),
            parish: String::from(parish),
        }
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  Pastorin   Müller \n"), "Pastorin Müller");
        assert_eq!(normalize_ws(""), "");
    }

    /// Shuffled input comes out grouped by ascending date, each group sorted
    /// ascending by start time.
    #[test]
    fn test_format_bulletin_grouping_and_order() {
        let records = vec![
            record(
                (2025, 4, 6, 10, 0),
                "Gottesdienst mit Abendmahl",
                "Büsum | St. Clemens",
                "Pastorin Müller",
                "KG Büsum",
            ),
            record(
                (2025, 4, 5, 18, 0),
                "Andacht zum Wochenschluss",
                "St. Annen-Kirche",
                "",
                "KG St. Annen",
            ),
            record(
                (2025, 4, 5, 9, 30),
                "Gottesdienst",
                "",
                "Diakon Schmidt",
                "Hennstedt",
            ),
        ];
        let expected = "Sonnabend, 5. April:\n\
            Hennstedt: 9.30 Uhr, Gd., D. Schmidt\n\
            St. Annen: 18 Uhr, Andacht\n\
            \n\
            Sonntag, 6. April:\n\
            Büsum: 10 Uhr, Gd. m. A., Pn. Müller\n";
        assert_eq!(format_bulletin(&records), expected);
    }

    /// A record without a start date is dropped, the rest of the run survives.
    #[test]
    fn test_format_bulletin_skips_records_without_date() {
        let mut undated = record((2025, 4, 5, 10, 0), "Gottesdienst", "Meldorf", "", "");
        undated.start = None;
        let records = vec![
            undated,
            record((2025, 4, 5, 10, 0), "Gottesdienst", "Lunden", "", ""),
        ];
        let expected = "Sonnabend, 5. April:\nLunden: 10 Uhr, Gd.\n";
        assert_eq!(format_bulletin(&records), expected);
    }

    #[test]
    fn test_format_bulletin_empty_input() {
        assert_eq!(format_bulletin(&[]), "");
    }
}
