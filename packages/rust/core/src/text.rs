//! Text helpers for turning URL segments into labels and back.

use std::sync::LazyLock;

use regex::Regex;

use crate::classifier::{MONGO_ID_RE, NUMERIC_ID_RE, UUID_RE};

static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("valid regex"));

static NON_ALNUM_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

pub(crate) static INVALID_SEGMENT_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>"'%{}|\\^`\[\]]"#).expect("valid regex"));

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static DASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

static SLASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/+").expect("valid regex"));

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{upper}{}", chars.as_str().to_lowercase())
        }
        None => String::new(),
    }
}

/// `kebab-case`, `snake_case` or spaced text → `Title Case`.
///
/// Runs of `-`, `_` and whitespace count as one separator; the result is
/// joined with single spaces.
pub fn to_title_case(s: &str) -> String {
    SEPARATOR_RUN_RE
        .split(s)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case each hyphen-delimited token, keeping every token (including
/// empty ones between doubled hyphens).
pub(crate) fn title_case_hyphenated(s: &str) -> String {
    s.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// URL-safe slug: lower-case, non-alphanumeric runs become `-`, no leading
/// or trailing dashes.
pub fn create_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALNUM_RUN_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Canonical path form: single leading slash, no trailing slash, no doubled
/// slashes. Empty input and `/` both map to `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    format!("/{}", SLASH_RUN_RE.replace_all(trimmed, "/"))
}

/// Clean arbitrary text for use as a single path segment.
pub fn sanitize_segment(segment: &str) -> String {
    let stripped = INVALID_SEGMENT_CHARS_RE.replace_all(segment, "");
    let dashed = WHITESPACE_RUN_RE.replace_all(&stripped, "-");
    let collapsed = DASH_RUN_RE.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_lowercase()
}

/// Context-free label for a segment, recognizing ids without any engine
/// configuration.
pub fn format_segment_label(segment: &str) -> String {
    match segment {
        "" => String::new(),
        "index" => "Home".to_string(),
        s if UUID_RE.is_match(s) => "Item Details".to_string(),
        s if MONGO_ID_RE.is_match(s) => "Details".to_string(),
        s if NUMERIC_ID_RE.is_match(s) => format!("Item #{s}"),
        s => to_title_case(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(to_title_case("hello-world"), "Hello World");
        assert_eq!(to_title_case("api_REFERENCE"), "Api Reference");
        assert_eq!(to_title_case("multi--dash__and  space"), "Multi Dash And Space");
        assert_eq!(to_title_case(""), "");
    }

    #[test]
    fn hyphenated_title_case_keeps_tokens() {
        assert_eq!(title_case_hyphenated("luxury-smartphone-pro"), "Luxury Smartphone Pro");
        assert_eq!(title_case_hyphenated("BIG-deal"), "Big Deal");
    }

    #[test]
    fn slug_creation() {
        assert_eq!(create_slug("Hello, World!"), "hello-world");
        assert_eq!(create_slug("  --Rust 2024--  "), "rust-2024");
    }

    #[test]
    fn path_normalization() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//products//phones/"), "/products/phones");
        assert_eq!(normalize_path("blog"), "/blog");
    }

    #[test]
    fn segment_sanitizing() {
        assert_eq!(sanitize_segment("  My <Cool> Page  "), "my-cool-page");
        assert_eq!(sanitize_segment("a -- b"), "a-b");
    }

    #[test]
    fn context_free_labels() {
        assert_eq!(format_segment_label("index"), "Home");
        assert_eq!(
            format_segment_label("123e4567-e89b-12d3-a456-426614174000"),
            "Item Details"
        );
        assert_eq!(format_segment_label("507f1f77bcf86cd799439011"), "Details");
        assert_eq!(format_segment_label("42"), "Item #42");
        assert_eq!(format_segment_label("١٢٣"), "١٢٣");
        assert_eq!(format_segment_label("getting-started"), "Getting Started");
    }
}
