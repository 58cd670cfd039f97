//! Maps free-text service titles to the fixed abbreviation vocabulary.

/// Ordered keyword table; a title matching several rows takes the first one,
/// so "Tauf-Gottesdienst mit Abendmahl" is a communion service.
static RULES: &[(&[&str], &str)] = &[
    (&["abendmahl"], "Gd. m. A."),
    (&["taufe"], "Gd. m. T."),
    (&["konfirmation"], "Konfirmation"),
    (&["kinderkirche", "kinder"], "Kinderkirche"),
    (&["familie"], "Familiengd."),
    (&["andacht"], "Andacht"),
];

static DEFAULT_LABEL: &str = "Gd.";

pub fn classify(title: &str) -> String {
    let title = title.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_LABEL)
        .to_string()
}
