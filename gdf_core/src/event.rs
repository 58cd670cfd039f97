use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// One scheduled service as delivered by a collaborator, either a spreadsheet
/// row or a ChurchDesk event. Free-text fields are kept verbatim apart from
/// whitespace normalization; missing optional fields degrade to the empty
/// string. Not mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Start of the service in Europe/Berlin local time. `None` when the
    /// source carried no parseable date; such records are skipped on output.
    pub start: Option<DateTime<Tz>>,
    pub title: String,
    pub location: String,
    pub contributor: String,
    /// Parish/community name, used as location fallback.
    pub parish: String,
}

/// One bulletin line with all fields normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub location: String,
    pub time: String,
    pub service_type: String,
    pub contributor: String,
}

impl FormattedLine {
    /// Render as `"<location>: <time>, <type>[, <contributor>]"`.
    ///
    /// The contributor segment is omitted entirely, including its comma, when
    /// the contributor is empty.
    pub fn render(&self) -> String {
        let mut line = format!("{}: {}, {}", self.location, self.time, self.service_type);
        if !self.contributor.is_empty() {
            line.push_str(", ");
            line.push_str(&self.contributor);
        }
        line
    }
}

/// The lines of one calendar date under its German heading, sorted ascending
/// by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub heading: String,
    pub lines: Vec<FormattedLine>,
}
