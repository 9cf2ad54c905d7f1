//! Structural validation of untyped configuration documents and generated
//! trails. Validators never fail; they collect messages into a
//! [`ValidationReport`].
//!
//! Config documents use camelCase keys (`maxSlugLength`, `customRoutes`,
//! `ariaLabels`); the snake_case spellings are accepted so TOML files read
//! naturally.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use crumbtrail_shared::{BreadcrumbItem, ValidationReport};

use crate::text::INVALID_SEGMENT_CHARS_RE;

const ANIMATION_TYPES: [&str; 5] = ["fade", "slide", "scale", "bounce", "none"];

const ARIA_LABELS: [&str; 4] = ["navigation", "current", "back", "separator"];

const RESERVED_SEGMENTS: [&str; 22] = [
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

static LOCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2,4})?$").expect("valid regex"));

/// First present key among `names`.
fn field<'a>(object: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

/// JavaScript-style truthiness for presence checks.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Check a breadcrumb configuration document.
pub fn validate_config(config: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    if let Some(locale) = config.get("locale") {
        if is_truthy(locale) && !locale.is_string() {
            errors.push("locale must be a string".to_string());
        }
    }

    if let Some(max) = field(config, &["maxSlugLength", "max_slug_length"]) {
        if !max.as_f64().is_some_and(|n| n >= 1.0) {
            errors.push("maxSlugLength must be a positive number".to_string());
        }
    }

    if let Some(routes) = field(config, &["customRoutes", "custom_routes"]).and_then(Value::as_object)
    {
        for (key, route) in routes {
            if !route.get("label").is_some_and(is_truthy) {
                errors.push(format!("customRoutes.{key}.label is required"));
            }
            let is_async = route.get("async").is_some_and(is_truthy);
            if is_async && !route.get("resolver").is_some_and(is_truthy) {
                errors.push(format!(
                    "customRoutes.{key}.resolver is required when async is true"
                ));
            }
        }
    }

    if let Some(animations) = config.get("animations").filter(|a| is_truthy(a)) {
        if let Some(kind) = animations.get("type").filter(|t| is_truthy(t)) {
            if !kind.as_str().is_some_and(|k| ANIMATION_TYPES.contains(&k)) {
                errors.push(format!(
                    "animations.type must be one of: {}",
                    ANIMATION_TYPES.join(", ")
                ));
            }
        }
        if let Some(duration) = animations.get("duration") {
            if !duration.as_f64().is_some_and(|d| d >= 0.0) {
                errors.push("animations.duration must be a non-negative number".to_string());
            }
        }
    }

    let aria_labels = config
        .get("accessibility")
        .and_then(|a| field(a, &["ariaLabels", "aria_labels"]));
    if let Some(labels) = aria_labels.filter(|l| is_truthy(l)) {
        for name in ARIA_LABELS {
            if let Some(label) = labels.get(name) {
                if is_truthy(label) && !label.is_string() {
                    errors.push(format!("accessibility.ariaLabels.{name} must be a string"));
                }
            }
        }
    }

    ValidationReport::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Trails
// ---------------------------------------------------------------------------

/// Check a generated trail: required fields, unique ids, at most one
/// current item, well-formed hrefs.
pub fn validate_breadcrumbs(items: &[BreadcrumbItem]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        if item.id.is_empty() {
            errors.push(format!(
                "breadcrumb at index {index} is missing required 'id' field"
            ));
        } else if !ids.insert(item.id.as_str()) {
            errors.push(format!("duplicate breadcrumb id '{}' at index {index}", item.id));
        }

        if item.label.is_empty() {
            errors.push(format!(
                "breadcrumb at index {index} is missing required 'label' field"
            ));
        }

        if item.href.is_empty() {
            errors.push(format!(
                "breadcrumb at index {index} is missing required 'href' field"
            ));
        } else if !is_valid_href(&item.href) {
            errors.push(format!(
                "breadcrumb at index {index} has invalid href '{}'",
                item.href
            ));
        }
    }

    if items.iter().filter(|i| i.current).count() > 1 {
        errors.push("only one breadcrumb item can be marked as current".to_string());
    }

    ValidationReport::from_errors(errors)
}

/// Root-relative path or parseable absolute URL.
pub fn is_valid_href(href: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    href.starts_with('/') || Url::parse(href).is_ok()
}

/// Non-empty, free of URL-unsafe characters, and not a reserved device name.
pub fn is_valid_path_segment(segment: &str) -> bool {
    if segment.is_empty() || INVALID_SEGMENT_CHARS_RE.is_match(segment) {
        return false;
    }
    let lowered = segment.to_lowercase();
    !RESERVED_SEGMENTS.contains(&lowered.as_str())
}

/// `language` or `language-REGION` (e.g. `en`, `pt-BR`).
pub fn is_valid_locale(locale: &str) -> bool {
    LOCALE_RE.is_match(locale)
}
