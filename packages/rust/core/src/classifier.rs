//! Segment classification: decides whether a path segment is a dynamic value
//! (id, slug, UUID) and how to label it.
//!
//! Patterns are held in one list sorted by descending priority. The sort is
//! stable and built-ins are placed first, so a caller pattern never outranks
//! a built-in of equal priority.

use std::cmp::Reverse;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crumbtrail_shared::{CrumbtrailError, PatternConfig, Result};

use crate::text::title_case_hyphenated;

pub(crate) static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});

pub(crate) static MONGO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid regex"));

/// ASCII digits only; other scripts' numerals are ordinary text.
pub(crate) static NUMERIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.+-.+-.+").expect("valid regex"));

static LONG_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{15,}$").expect("valid regex"));

/// Label formatter attached to a pattern; used only when that pattern wins.
pub type SegmentFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

// ---------------------------------------------------------------------------
// SegmentPattern
// ---------------------------------------------------------------------------

/// One classification rule.
#[derive(Clone)]
pub struct SegmentPattern {
    pub name: String,
    pub regex: Regex,
    pub priority: i32,
    pub formatter: Option<SegmentFormatter>,
}

impl SegmentPattern {
    pub fn new(name: impl Into<String>, regex: Regex, priority: i32) -> Self {
        Self {
            name: name.into(),
            regex,
            priority,
            formatter: None,
        }
    }

    /// Attach a formatter used when this pattern is the winning match.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn matches(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }
}

impl fmt::Debug for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentPattern")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .field("priority", &self.priority)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl TryFrom<&PatternConfig> for SegmentPattern {
    type Error = CrumbtrailError;

    fn try_from(config: &PatternConfig) -> Result<Self> {
        let regex = Regex::new(&config.pattern).map_err(|e| {
            CrumbtrailError::config(format!(
                "invalid pattern `{}` ({}): {e}",
                config.name, config.pattern
            ))
        })?;
        Ok(Self::new(config.name.clone(), regex, config.priority))
    }
}

/// Built-in patterns, highest priority first.
fn builtin_patterns() -> Vec<SegmentPattern> {
    vec![
        SegmentPattern::new("uuid", UUID_RE.clone(), 100),
        SegmentPattern::new("mongoId", MONGO_ID_RE.clone(), 90),
        SegmentPattern::new("numericId", NUMERIC_ID_RE.clone(), 80),
        SegmentPattern::new("slug", SLUG_RE.clone(), 70).with_formatter(title_case_hyphenated),
        SegmentPattern::new("longString", LONG_STRING_RE.clone(), 60),
    ]
}

// ---------------------------------------------------------------------------
// SegmentClassifier
// ---------------------------------------------------------------------------

/// Priority-ordered pattern table.
#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    patterns: Vec<SegmentPattern>,
}

impl SegmentClassifier {
    /// Built-ins followed by `custom`, sorted once by descending priority.
    pub fn new(custom: impl IntoIterator<Item = SegmentPattern>) -> Self {
        let mut patterns = builtin_patterns();
        patterns.extend(custom);
        // Stable: equal priorities keep insertion order.
        patterns.sort_by_key(|p| Reverse(p.priority));
        Self { patterns }
    }

    /// Active patterns in evaluation order.
    pub fn patterns(&self) -> &[SegmentPattern] {
        &self.patterns
    }

    /// False for listed static routes; otherwise true iff any pattern matches.
    pub fn is_dynamic(&self, segment: &str, static_routes: &[String]) -> bool {
        if static_routes.iter().any(|r| r == segment) {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(segment))
    }

    /// Highest-priority matching pattern.
    pub fn classify(&self, segment: &str) -> Option<&SegmentPattern> {
        self.patterns.iter().find(|p| p.matches(segment))
    }

    /// Label for a dynamic segment: the winning pattern's formatter if it has
    /// one, else title-cased hyphen tokens, else the segment unchanged.
    pub fn format_dynamic(&self, segment: &str) -> String {
        if let Some(formatter) = self.classify(segment).and_then(|p| p.formatter.as_ref()) {
            return formatter(segment);
        }

        if segment.contains('-') {
            title_case_hyphenated(segment)
        } else {
            segment.to_string()
        }
    }
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
