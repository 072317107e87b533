//! Name normalization helpers shared by items and categories.
//!
//! Every published entity carries a `normalizedName` (URL slug) and
//! categories additionally carry an `enumName` (PascalCase identifier used
//! by downstream schema generation).

use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s").expect("valid regex"));
static SLUG_INVALID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-]").expect("valid regex"));
static DASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Convert a display name into a URL-safe slug.
///
/// Transliterates to ASCII, lowercases, replaces whitespace with `-`, strips
/// anything outside `[a-z0-9-]`, collapses dash runs and trims edge dashes.
///
/// # Examples
///
/// ```
/// use stash_core::naming::normalize_name;
///
/// assert_eq!(normalize_name("5.45x39mm PS gs"), "545x39mm-ps-gs");
/// assert_eq!(normalize_name("  AK-74N  "), "ak-74n");
/// assert_eq!(normalize_name("Патрон 7.62"), "patron-762");
/// ```
pub fn normalize_name(name: &str) -> String {
    let lowered = deunicode(name).trim().to_lowercase();
    let dashed = WHITESPACE_RE.replace_all(&lowered, "-");
    let stripped = SLUG_INVALID_RE.replace_all(&dashed, "");
    DASH_RUN_RE.replace_all(&stripped, "-").trim_matches('-').to_string()
}

/// Convert a category display name into a PascalCase enum identifier.
///
/// The first character is kept as-is, every later word start is upper-cased,
/// and all non-alphanumerics are dropped.
///
/// ```
/// use stash_core::naming::category_enum_name;
///
/// assert_eq!(category_enum_name("Assault rifle"), "AssaultRifle");
/// assert_eq!(category_enum_name("Gear components"), "GearComponents");
/// ```
pub fn category_enum_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_word = false;
    for (i, ch) in name.chars().enumerate() {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && i > 0 && !prev_is_word {
            out.extend(ch.to_uppercase());
        } else if is_word {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out.retain(|c| c.is_ascii_alphanumeric());
    out
}

/// `only-flea` -> `onlyFlea`.
pub fn dash_to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for ch in input.to_lowercase().chars() {
        if ch == '-' && !upper_next {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    if upper_next {
        out.push('-');
    }
    out
}

/// `AssaultRifle` -> `Assault Rifle`; used when a template has no
/// translated name.
pub fn camel_case_to_title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    let trimmed = out.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
