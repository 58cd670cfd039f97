//! German date and time labels for the bulletin.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Weekday};
use chrono_tz::Tz;

/// Saturday is "Sonnabend" in the paper's region, never "Samstag".
fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Sonnabend",
        Weekday::Sun => "Sonntag",
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Januar",
        2 => "Februar",
        3 => "März",
        4 => "April",
        5 => "Mai",
        6 => "Juni",
        7 => "Juli",
        8 => "August",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "Dezember",
        _ => "Unbekannt",
    }
}

/// `"<Weekday>, <day>. <Month>"`, e.g. `"Sonnabend, 5. April"`.
pub fn format_day(date: NaiveDate) -> String {
    format!(
        "{}, {}. {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month())
    )
}

/// Like [`format_day`], but tolerates a missing timestamp: `None` becomes the
/// empty string so an incomplete record never fails the run.
pub fn format_date(start: Option<DateTime<Tz>>) -> String {
    start
        .map(|start| format_day(start.date_naive()))
        .unwrap_or_default()
}

/// `"<hour> Uhr"` on the full hour, else `"<hour>.<minute:02> Uhr"`. The hour
/// is never zero-padded. `None` becomes the empty string.
pub fn format_time(start: Option<DateTime<Tz>>) -> String {
    let Some(start) = start else {
        return String::new();
    };
    if start.minute() == 0 {
        format!("{} Uhr", start.hour())
    } else {
        format!("{}.{:02} Uhr", start.hour(), start.minute())
    }
}
