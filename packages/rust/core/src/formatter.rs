//! Label formatting for static segments: region display names, title case,
//! translations and truncation.

use std::fmt;
use std::sync::Arc;

use crumbtrail_shared::Translations;

use crate::text::to_title_case;

/// Ellipsis appended to truncated labels.
const ELLIPSIS: &str = "...";

/// Optional display-name service: `(region_code, locale) -> name`.
///
/// Called only for two-character segments, with the code upper-cased.
/// Returning `None` falls back to title case.
pub type DisplayNames = Arc<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

/// Locale-aware label formatter owned by one engine.
#[derive(Clone)]
pub struct LabelFormatter {
    translations: Translations,
    locale: String,
    display_names: Option<DisplayNames>,
}

impl LabelFormatter {
    pub fn new(translations: Translations, locale: impl Into<String>) -> Self {
        Self {
            translations,
            locale: locale.into(),
            display_names: None,
        }
    }

    /// Attach a region display-name service.
    pub fn with_display_names(mut self, display_names: Option<DisplayNames>) -> Self {
        self.display_names = display_names;
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Label for a static segment.
    pub fn format_segment(&self, segment: &str) -> String {
        if segment.chars().count() == 2 {
            if let Some(lookup) = &self.display_names {
                let code = segment.to_uppercase();
                match lookup(&code, &self.locale) {
                    Some(name) if !name.is_empty() => return name,
                    _ => tracing::trace!(%code, locale = %self.locale, "no display name"),
                }
            }
        }

        to_title_case(segment)
    }

    /// Configured string for `key`, or `key` itself.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.get(key)
    }

    /// Cut `label` to exactly `max_len` characters, ending in `...`, when it
    /// is longer than `max_len`.
    pub fn truncate(&self, label: &str, max_len: usize) -> String {
        truncate_label(label, max_len)
    }
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::new(Translations::default(), "en")
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFormatter")
            .field("translations", &self.translations)
            .field("locale", &self.locale)
            .field("display_names", &self.display_names.is_some())
            .finish()
    }
}

/// Character-based truncation. For `max_len < 3` the result is a prefix of
/// the ellipsis itself.
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        return label.to_string();
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = label.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_segments_as_title_case() {
        let formatter = LabelFormatter::default();
        assert_eq!(formatter.format_segment("hello-world"), "Hello World");
        assert_eq!(formatter.format_segment("user_settings"), "User Settings");
        assert_eq!(formatter.format_segment("us"), "Us");
    }

    #[test]
    fn two_letter_segments_use_display_names() {
        let lookup: DisplayNames = Arc::new(|code: &str, locale: &str| match (code, locale) {
            ("US", "en") => Some("United States".to_string()),
            ("US", "fr") => Some("États-Unis".to_string()),
            _ => None,
        });

        let en = LabelFormatter::default().with_display_names(Some(lookup.clone()));
        assert_eq!(en.format_segment("us"), "United States");
        assert_eq!(en.format_segment("xx"), "Xx");
        assert_eq!(en.format_segment("usa"), "Usa");

        let fr = LabelFormatter::new(Translations::default(), "fr").with_display_names(Some(lookup));
        assert_eq!(fr.format_segment("us"), "États-Unis");
    }

    #[test]
    fn handles_translations() {
        let formatter = LabelFormatter::new(Translations::with_overrides([("home", "Casa")]), "es");
        assert_eq!(formatter.translate("home"), "Casa");
        assert_eq!(formatter.translate("details"), "Details");
        assert_eq!(formatter.translate("unknown"), "unknown");
    }

    #[test]
    fn truncates_labels() {
        let formatter = LabelFormatter::default();
        let truncated =
            formatter.truncate("this-is-a-very-long-label-that-needs-truncation", 20);
        assert_eq!(truncated, "this-is-a-very-lo...");
        assert_eq!(truncated.chars().count(), 20);

        assert_eq!(formatter.truncate("short", 20), "short");
        assert_eq!(formatter.truncate("exactly-ten", 11), "exactly-ten");
    }

    #[test]
    fn truncation_is_char_based() {
        let label = "ééééééééééééééé";
        let truncated = truncate_label(label, 8);
        assert_eq!(truncated, "ééééé...");
        assert_eq!(truncated.chars().count(), 8);
    }

    #[test]
    fn degenerate_max_lengths() {
        assert_eq!(truncate_label("abcdef", 2), "..");
        assert_eq!(truncate_label("abcdef", 0), "");
    }
}
