//! Name canonicalization for Indonesian administrative place names.
//!
//! A raw name such as "Kabupaten Bandung Barat" is reduced to a single key token
//! ("Bandung") so that the many spellings scraped from listings group together.
//!
//! The reduction keeps only the LAST surviving token. Multi-word names therefore
//! collapse to their final word: "Kota Tangerang Selatan" becomes "Tangerang",
//! "Jawa Timur" and "Jawa Barat" both become "Jawa", "Jawa Tengah" becomes "Tengah".
//! Callers rely on this exact behavior for stable facet keys.

use std::sync::OnceLock;

use regex::Regex;

/// Compass qualifiers dropped after cleaning ("Jakarta Selatan" -> "Jakarta").
pub const DIRECTION_STOPWORDS: &[&str] = &["pusat", "timur", "barat", "utara", "selatan"];

static DESIGNATION_REGEX: OnceLock<Regex> = OnceLock::new();
static NON_LETTER_REGEX: OnceLock<Regex> = OnceLock::new();

// Substring match, not whole-word: "Kotamobagu" loses its "kota" too.
fn designation_regex() -> &'static Regex {
    DESIGNATION_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)(provinsi|kabupaten|kota|daerah(?:\s+khusus|\s+istimewa)?|dki|kab\.|kota\.|prov\.)",
        )
        .expect("Failed to compile designation regex")
    })
}

fn non_letter_regex() -> &'static Regex {
    NON_LETTER_REGEX.get_or_init(|| {
        Regex::new(r"[^a-z\s]").expect("Failed to compile non-letter regex")
    })
}

/// Strips designations, non-letters and direction stopwords, returning the
/// remaining lower-case tokens in order.
pub fn clean_tokens(raw: &str) -> Vec<String> {
    let stripped = designation_regex().replace_all(raw, "");
    let lowered = stripped.to_lowercase();
    let letters_only = non_letter_regex().replace_all(&lowered, "");

    letters_only
        .split_whitespace()
        .filter(|token| !DIRECTION_STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Returns the canonical key for a raw place name, or `None` when nothing
/// survives cleaning.
pub fn canonicalize(raw: &str) -> Option<String> {
    clean_tokens(raw).last().map(|token| title_case(token))
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
