//! Core domain types for breadcrumb trails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque pass-through bag attached to an item. Never interpreted.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// BreadcrumbItem
// ---------------------------------------------------------------------------

/// One entry in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    /// Identifier, unique within one generated trail.
    pub id: String,
    /// Display text (already formatted, translated and truncated).
    pub label: String,
    /// Root-relative path this item navigates to.
    pub href: String,
    /// True only for the last item of a trail.
    pub current: bool,
    /// Presentation hint (icon name, emoji, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl BreadcrumbItem {
    /// Plain item with no presentation flags.
    pub fn new(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: href.into(),
            current: false,
            icon: None,
            disabled: false,
            hidden: false,
            metadata: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RouteContext
// ---------------------------------------------------------------------------

/// Position of a segment within the path being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteContext {
    /// Running prefix up to and including this segment (e.g. `/products/42`).
    pub pathname: String,
    /// Every accepted segment of the path.
    pub segments: Vec<String>,
    /// Zero-based index of this segment in `segments`.
    pub index: usize,
    /// Item most recently appended to the trail, if any.
    pub parent: Option<BreadcrumbItem>,
}

impl RouteContext {
    /// Literal name of the preceding segment, or `""` for the first one.
    pub fn previous_segment(&self) -> &str {
        match self.index.checked_sub(1) {
            Some(i) => self.segments.get(i).map(String::as_str).unwrap_or(""),
            None => "",
        }
    }

    /// Whether this is the only accepted segment of the path.
    pub fn is_sole_segment(&self) -> bool {
        self.index == 0 && self.segments.len() == 1
    }
}

// ---------------------------------------------------------------------------
// RouteOverride
// ---------------------------------------------------------------------------

/// Partial item data produced by an asynchronous route resolver.
/// Omitted fields keep their pre-resolution values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl RouteOverride {
    /// Override carrying only a label.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// Translation table for the fixed UI strings (`home`, `details`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Default for Translations {
    fn default() -> Self {
        let entries = [
            ("home", "Home"),
            ("back", "Back"),
            ("details", "Details"),
            ("loading", "Loading..."),
            ("error", "Error"),
        ];
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl Translations {
    /// Defaults with `overrides` merged on top.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut t = Self::default();
        for (k, v) in overrides {
            t.0.insert(k.into(), v.into());
        }
        t
    }

    /// Look up `key`, returning the key itself when no entry exists.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        match self.0.get(key) {
            Some(v) if !v.is_empty() => v.as_str(),
            _ => key,
        }
    }

    /// Add or replace a single entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// Outcome of a structural validation pass. Never an error by itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Build a report from collected error messages.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serialization_omits_defaults() {
        let item = BreadcrumbItem::new("breadcrumb-home", "Home", "/");
        let json = serde_json::to_string(&item).expect("serialize");
        assert_eq!(
            json,
            r#"{"id":"breadcrumb-home","label":"Home","href":"/","current":false}"#
        );

        let parsed: BreadcrumbItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, item);
    }

    #[test]
    fn translations_fall_back_to_key() {
        let t = Translations::with_overrides([("home", "Casa")]);
        assert_eq!(t.get("home"), "Casa");
        assert_eq!(t.get("details"), "Details");
        assert_eq!(t.get("unknown"), "unknown");
    }

    #[test]
    fn context_previous_segment() {
        let ctx = RouteContext {
            pathname: "/users/42".into(),
            segments: vec!["users".into(), "42".into()],
            index: 1,
            parent: None,
        };
        assert_eq!(ctx.previous_segment(), "users");
        assert!(!ctx.is_sole_segment());

        let first = RouteContext { index: 0, ..ctx };
        assert_eq!(first.previous_segment(), "");
    }

    #[test]
    fn report_validity_tracks_errors() {
        assert!(ValidationReport::from_errors(vec![]).valid);
        assert!(!ValidationReport::from_errors(vec!["x".into()]).valid);
    }
}
