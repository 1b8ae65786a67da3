//! Locale tag parsing
//!
//! Only the primary language subtag matters for resolution; region, script
//! and variant subtags are validated for shape and then ignored.

/// Deprecated ISO 639-1 codes still seen in locale data, mapped to their
/// current form.
static LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("iw", "he"),
    ("in", "id"),
    ("ji", "yi"),
    ("jw", "jv"),
    ("mo", "ro"),
];

/// Extract the base language subtag from a locale tag.
///
/// `"de-DE"` → `"de"`, `"EN"` → `"en"`, `"iw-IL"` → `"he"`. Input that does
/// not parse as a structured tag is returned unchanged.
pub fn base_subtag(tag: &str) -> String {
    match language_subtag(tag) {
        Some(language) => canonical_alias(&language).unwrap_or(language),
        None => tag.to_string(),
    }
}

/// Primary language subtag of a well-formed tag.
///
/// Subtags must come in order: language, up to three extlangs, script,
/// region, distinct variants, extensions (each singleton used once and
/// followed by at least one subtag), then private use.
fn language_subtag(tag: &str) -> Option<String> {
    let subtags: Vec<&str> = tag.split('-').collect();
    let (&language, rest) = subtags.split_first()?;

    if !(matches!(language.len(), 2..=3 | 5..=8) && is_alpha(language)) {
        return None;
    }

    let mut i = 0;
    let next = |i: usize| rest.get(i).copied();

    if language.len() <= 3 {
        let mut extlangs = 0;
        while extlangs < 3 && next(i).is_some_and(|s| s.len() == 3 && is_alpha(s)) {
            extlangs += 1;
            i += 1;
        }
    }
    if next(i).is_some_and(|s| s.len() == 4 && is_alpha(s)) {
        i += 1;
    }
    if next(i).is_some_and(is_region) {
        i += 1;
    }

    let mut variants: Vec<String> = Vec::new();
    while let Some(variant) = next(i).filter(|s| is_variant(s)) {
        let variant = variant.to_ascii_lowercase();
        if variants.contains(&variant) {
            return None;
        }
        variants.push(variant);
        i += 1;
    }

    let mut singletons: Vec<char> = Vec::new();
    while let Some(key) = next(i).and_then(singleton) {
        if key == 'x' {
            break;
        }
        if singletons.contains(&key) {
            return None;
        }
        singletons.push(key);
        i += 1;

        let start = i;
        while next(i).is_some_and(|s| (2..=8).contains(&s.len()) && is_alphanumeric(s)) {
            i += 1;
        }
        if i == start {
            return None;
        }
    }

    if next(i).and_then(singleton) == Some('x') {
        i += 1;
        let start = i;
        while next(i).is_some_and(|s| (1..=8).contains(&s.len()) && is_alphanumeric(s)) {
            i += 1;
        }
        if i == start {
            return None;
        }
    }

    if i == rest.len() {
        Some(language.to_ascii_lowercase())
    } else {
        None
    }
}

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_region(s: &str) -> bool {
    (s.len() == 2 && is_alpha(s)) || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
}

fn is_variant(s: &str) -> bool {
    match s.len() {
        5..=8 => is_alphanumeric(s),
        4 => s.starts_with(|c: char| c.is_ascii_digit()) && is_alphanumeric(s),
        _ => false,
    }
}

fn singleton(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

fn canonical_alias(language: &str) -> Option<String> {
    LANGUAGE_ALIASES
        .iter()
        .find(|(old, _)| *old == language)
        .map(|(_, current)| current.to_string())
}
