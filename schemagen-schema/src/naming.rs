//! Type identifier derivation.
//!
//! Collection names are plural and lower/underscore separated
//! (`user_accounts`). Generated declarations are named by the singular
//! PascalCase form (`UserAccount`). Every component joins on this name, so
//! the conversion must stay a pure function of its input.

/// Words that are the same in singular and plural form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "moose",
    "metadata",
    "feedback",
    "software",
    "media",
];

/// Irregular plural to singular pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("criteria", "criterion"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("quizzes", "quiz"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("echoes", "echo"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("leaves", "leaf"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("caches", "cache"),
    ("statuses", "status"),
    ("buses", "bus"),
    ("bonuses", "bonus"),
    ("campuses", "campus"),
    ("viruses", "virus"),
];

/// Suffix rewrites, first match wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("lves", "lf"),
];

/// Endings that already read as singular.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Converts a plural collection name to its singular form.
///
/// Only the last separator-delimited segment is rewritten, so
/// `blog_people` becomes `blog_person`.
///
/// `"news"` is not treated as uncountable and becomes `"new"`.
#[must_use]
pub fn singularize(word: &str) -> String {
    let split = word
        .char_indices()
        .filter(|&(_, c)| is_separator(c))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let (prefix, last) = word.split_at(split);
    format!("{prefix}{}", singularize_segment(last))
}

fn singularize_segment(segment: &str) -> String {
    let lower = segment.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return segment.to_string();
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            let stem = segment
                .get(..segment.len() - suffix.len())
                .unwrap_or(&lower[..lower.len() - suffix.len()]);
            return format!("{stem}{replacement}");
        }
    }

    if SINGULAR_ENDINGS.iter().any(|ending| lower.ends_with(ending)) {
        return segment.to_string();
    }

    match segment.strip_suffix(['s', 'S']) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => segment.to_string(),
    }
}

/// Converts a string to PascalCase.
///
/// Each separator-delimited segment gets an uppercase first character and a
/// lowercase remainder; empty segments are dropped.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for segment in s.split(is_separator).filter(|seg| !seg.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.extend(chars.flat_map(char::to_lowercase));
        }
    }

    result
}

/// Derives the type identifier for a collection name.
#[must_use]
pub fn type_identifier(collection: &str) -> String {
    to_pascal_case(&singularize(collection))
}

/// Returns true if `name` can be used unquoted as a property or type name.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
