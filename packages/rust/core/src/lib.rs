//! Breadcrumb generation for Crumbtrail.
//!
//! [`BreadcrumbEngine`] turns a URL path into an ordered trail of
//! [`BreadcrumbItem`](crumbtrail_shared::BreadcrumbItem)s, classifying
//! dynamic segments, applying custom routes and resolvers, and caching the
//! result per path and option set.

pub mod classifier;
pub mod engine;
pub mod formatter;
pub mod options;
pub mod plugin;
pub mod schema;
pub mod text;
pub mod validation;

pub use classifier::{SegmentClassifier, SegmentFormatter, SegmentPattern};
pub use engine::BreadcrumbEngine;
pub use formatter::{DisplayNames, LabelFormatter, truncate_label};
pub use options::{
    BreadcrumbOptions, CallbackResult, CustomRoute, EngineOptions, Resolver, RouteLabel,
};
pub use plugin::{Plugin, apply_render_hooks};
pub use schema::{format_breadcrumbs_for_schema, validate_schema_data};
pub use validation::{
    is_valid_href, is_valid_locale, is_valid_path_segment, validate_breadcrumbs, validate_config,
};
