//! Maps free-text venue strings to the short labels the bulletin prints.

/// Cities with more than one church site; only for these the church name may
/// appear next to the city.
static MULTI_CHURCH_CITIES: &[&str] = &["heide", "brunsbüttel", "büsum"];

/// Büsum's main church; the city name alone is the canonical label.
static MAIN_CHURCH: &str = "st. clemens";

/// Canonical labels for bare venue names without a city separator.
static CANONICAL: &[(&str, &str)] = &[
    ("st. annen-kirche", "St. Annen"),
    ("marien-kirche", "Eddelak"),
    ("st.-jürgen-kirche", "Heide, St.-Jürgen-Kirche"),
    ("auferstehungskirche", "Heide, Auferstehungskirche"),
    ("st. clemens", "Büsum"),
    ("st. secundus", "Hennstedt"),
    ("st. bartholomäus", "Wesselburen"),
];

fn is_multi_church(city: &str) -> bool {
    let city = city.to_lowercase();
    MULTI_CHURCH_CITIES
        .iter()
        .any(|candidate| city.contains(candidate))
}

/// Resolve a venue string. Handles the "City | Church" form of the API, the
/// "City, Church" form of the spreadsheet export, and bare venue names.
pub fn resolve(location: &str) -> String {
    let location = location.trim();
    if location.is_empty() {
        return String::new();
    }
    if let Some((city, church)) = location.split_once(" | ") {
        return resolve_piped(city.trim(), church.trim());
    }
    if let Some((city, church)) = location.split_once(", ") {
        return resolve_comma(location, city.trim(), church.trim());
    }
    let lower = location.to_lowercase();
    CANONICAL
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| location.to_string())
}

fn resolve_piped(city: &str, church: &str) -> String {
    if !is_multi_church(city) {
        return city.to_string();
    }
    if church.to_lowercase().contains(MAIN_CHURCH) {
        // Canonical simplification: the main church needs no church name.
        city.to_string()
    } else {
        format!("{city}, {church}")
    }
}

fn resolve_comma(original: &str, city: &str, church: &str) -> String {
    // Heide is asymmetric: the full string is kept, always.
    if city.to_lowercase().contains("heide") {
        return original.to_string();
    }
    if is_multi_church(city) {
        let church = church.to_lowercase();
        if church.contains("gemeindehaus") || church.contains("kapelle") {
            return original.to_string();
        }
        return city.to_string();
    }
    city.to_string()
}
