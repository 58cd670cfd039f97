//! Maps the free-text contributor field to role-prefixed names.

/// Whole-field values that are printed verbatim.
static VERBATIM: &[&str] = &["Kirchspiel-Pastor:innen", "Konfirmand:innen"];

/// Delimiters joining multiple names, tried in order; only the first one found
/// is applied per record.
static DELIMITERS: &[&str] = &[", ", " & ", " und ", " + ", " / "];

/// Role prefixes stripped from the start of a name before the role is derived
/// again from the unstripped text. Longer prefixes first, so "Pastorin " is
/// never half-stripped by "Pastor ".
static STRIP_PREFIXES: &[&str] = &[
    "Prädikantin ",
    "Prädikant ",
    "Pastorin ",
    "Pastores ",
    "Pastor ",
    "Pfarrerin ",
    "Pfarrer ",
    "Diakonin ",
    "Diakon ",
    "Dn. ",
    "Pn. ",
    "Ps. ",
    "P. ",
    "D. ",
];

/// Ordered role table, matched case-insensitively against the original
/// (unstripped) name. "Prädikant" stays unabridged. No default role: a name
/// matching nothing is kept unprefixed.
static ROLE_RULES: &[(&[&str], &str)] = &[
    (&["diakonin"], "Dn."),
    (&["diakon"], "D."),
    (&["pastores"], "Ps."),
    (&["pastorin"], "Pn."),
    (&["pastor", "pfarrer"], "P."),
    (&["pn."], "Pn."),
    (&["p."], "P."),
    (&["prädikant"], "Prädikant"),
];

/// The separator used to rejoin multiple names, regardless of the original
/// delimiter.
static JOIN: &str = " & ";

pub fn format(contributor: &str) -> String {
    let contributor = contributor.trim();
    if contributor.is_empty() {
        return String::new();
    }
    if VERBATIM.contains(&contributor) {
        return contributor.to_string();
    }
    let names: Vec<String> = match DELIMITERS
        .iter()
        .find(|delimiter| contributor.contains(*delimiter))
    {
        Some(delimiter) => contributor.split(delimiter).map(format_name).collect(),
        None => vec![format_name(contributor)],
    };
    names.join(JOIN)
}

fn format_name(raw: &str) -> String {
    let raw = raw.trim();
    let name = strip_role_prefix(raw);
    let lower = raw.to_lowercase();
    match ROLE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(keyword)))
    {
        Some((_, prefix)) => format!("{prefix} {name}"),
        None => name.to_string(),
    }
}

fn strip_role_prefix(name: &str) -> &str {
    let lower = name.to_lowercase();
    for prefix in STRIP_PREFIXES {
        // The prefixes only contain characters whose byte length survives
        // lowercasing, so the index into the original string is sound.
        if lower.starts_with(&prefix.to_lowercase()) {
            return name[prefix.len()..].trim_start();
        }
    }
    name
}
