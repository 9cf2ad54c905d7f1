//! Construction-time and per-call options, including the caller-supplied
//! callbacks (label functions, resolvers, skip predicates, id generators).
//!
//! Every callback is a narrow `Arc<dyn Fn>` field. Callbacks return
//! [`CallbackResult`]; an `Err` aborts the generation call, except for
//! resolvers whose failures are logged and ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crumbtrail_shared::{
    AppConfig, BoxError, BreadcrumbItem, EngineConfig, Metadata, RouteConfig, RouteContext,
    RouteOverride, Translations,
};

use crate::classifier::SegmentPattern;
use crate::formatter::DisplayNames;
use crate::plugin::Plugin;

/// Result type returned by caller callbacks.
pub type CallbackResult<T> = std::result::Result<T, BoxError>;

/// Future returned by an asynchronous route resolver.
pub type ResolverFuture = Pin<Box<dyn Future<Output = CallbackResult<RouteOverride>> + Send>>;

/// Asynchronous resolver: `(segment, context) -> override`.
pub type Resolver = Arc<dyn Fn(String, RouteContext) -> ResolverFuture + Send + Sync>;

/// Custom-route label computed from the current path prefix.
pub type LabelFn = Arc<dyn Fn(&str) -> CallbackResult<String> + Send + Sync>;

/// Global label formatter replacing the default resolution.
pub type FormatLabelFn = Arc<dyn Fn(&str, &RouteContext) -> CallbackResult<String> + Send + Sync>;

/// Skip predicate replacing the built-in restricted-route rule.
pub type SkipFn = Arc<dyn Fn(&str, &RouteContext) -> CallbackResult<bool> + Send + Sync>;

/// Id generator: `(item, segment index) -> id`.
pub type IdFn = Arc<dyn Fn(&BreadcrumbItem, usize) -> CallbackResult<String> + Send + Sync>;

// ---------------------------------------------------------------------------
// EngineOptions
// ---------------------------------------------------------------------------

/// Everything captured when an engine is built.
#[derive(Clone, Default)]
pub struct EngineOptions {
    /// Engine settings; `dynamic_patterns` are compiled at construction.
    pub config: EngineConfig,
    /// Extra compiled patterns (may carry formatters).
    pub patterns: Vec<SegmentPattern>,
    pub translations: Translations,
    /// Locale tag passed to the display-name service. Defaults to `en`.
    pub locale: Option<String>,
    pub display_names: Option<DisplayNames>,
}

impl EngineOptions {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: SegmentPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_display_names<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.display_names = Some(Arc::new(lookup));
        self
    }
}

impl From<&AppConfig> for EngineOptions {
    fn from(app: &AppConfig) -> Self {
        let mut options = Self::new(app.engine.clone())
            .with_translations(Translations::with_overrides(app.translations.clone()))
            .with_locale(app.locale.clone());

        if !app.regions.is_empty() {
            let regions: BTreeMap<String, String> = app
                .regions
                .iter()
                .map(|(code, name)| (code.to_uppercase(), name.clone()))
                .collect();
            options = options.with_display_names(move |code, _locale| regions.get(code).cloned());
        }

        options
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("config", &self.config)
            .field("patterns", &self.patterns)
            .field("translations", &self.translations)
            .field("locale", &self.locale)
            .field("display_names", &self.display_names.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CustomRoute
// ---------------------------------------------------------------------------

/// Label of a custom route: literal text or a function of the path prefix.
#[derive(Clone)]
pub enum RouteLabel {
    Text(String),
    Computed(LabelFn),
}

impl RouteLabel {
    pub(crate) fn resolve(&self, pathname: &str) -> CallbackResult<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Computed(f) => f(pathname),
        }
    }
}

impl fmt::Debug for RouteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Caller-declared override for one exact segment string.
#[derive(Clone)]
pub struct CustomRoute {
    pub label: RouteLabel,
    pub icon: Option<String>,
    pub disabled: bool,
    pub hidden: bool,
    pub metadata: Option<Metadata>,
    /// Only async routes consult `resolver`.
    pub is_async: bool,
    pub resolver: Option<Resolver>,
}

impl CustomRoute {
    /// Route with a literal label.
    pub fn new(label: impl Into<String>) -> Self {
        Self::from_label(RouteLabel::Text(label.into()))
    }

    /// Route whose label is computed from the current path prefix.
    pub fn computed<F>(label: F) -> Self
    where
        F: Fn(&str) -> CallbackResult<String> + Send + Sync + 'static,
    {
        Self::from_label(RouteLabel::Computed(Arc::new(label)))
    }

    fn from_label(label: RouteLabel) -> Self {
        Self {
            label,
            icon: None,
            disabled: false,
            hidden: false,
            metadata: None,
            is_async: false,
            resolver: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Mark the route asynchronous and attach its resolver.
    pub fn with_resolver<F, Fut>(mut self, resolver: F) -> Self
    where
        F: Fn(String, RouteContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult<RouteOverride>> + Send + 'static,
    {
        self.is_async = true;
        self.resolver = Some(Arc::new(move |segment, context| {
            Box::pin(resolver(segment, context)) as ResolverFuture
        }));
        self
    }
}

impl From<&RouteConfig> for CustomRoute {
    fn from(config: &RouteConfig) -> Self {
        Self {
            icon: config.icon.clone(),
            disabled: config.disabled,
            hidden: config.hidden,
            ..Self::new(config.label.clone())
        }
    }
}

impl fmt::Debug for CustomRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRoute")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("disabled", &self.disabled)
            .field("hidden", &self.hidden)
            .field("is_async", &self.is_async)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// BreadcrumbOptions
// ---------------------------------------------------------------------------

/// Per-call options for [`BreadcrumbEngine::generate`](crate::BreadcrumbEngine::generate).
///
/// Only `show_on_home`, the locale/restricted/length overrides and the set
/// of custom-route keys take part in the cache key. Callbacks do not: two
/// calls differing only in callbacks share a cache entry.
#[derive(Clone, Default)]
pub struct BreadcrumbOptions {
    /// Return a lone current home item for the root path.
    pub show_on_home: bool,
    /// Overrides keyed by exact segment.
    pub custom_routes: BTreeMap<String, CustomRoute>,
    /// Replaces the engine's locale list for this call.
    pub locales: Option<Vec<String>>,
    /// Replaces the engine's restricted-route list for this call.
    pub restricted_routes: Option<Vec<String>>,
    /// Replaces the engine's maximum label length for this call.
    pub max_label_length: Option<usize>,
    pub format_label: Option<FormatLabelFn>,
    pub should_skip_segment: Option<SkipFn>,
    pub generate_id: Option<IdFn>,
    pub plugins: Vec<Plugin>,
}

impl BreadcrumbOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_on_home(mut self, show: bool) -> Self {
        self.show_on_home = show;
        self
    }

    pub fn with_route(mut self, segment: impl Into<String>, route: CustomRoute) -> Self {
        self.custom_routes.insert(segment.into(), route);
        self
    }

    /// Add static routes from `[routes]` configuration.
    pub fn with_route_configs<'a>(
        mut self,
        routes: impl IntoIterator<Item = (&'a String, &'a RouteConfig)>,
    ) -> Self {
        for (segment, config) in routes {
            self.custom_routes.insert(segment.clone(), CustomRoute::from(config));
        }
        self
    }

    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_restricted_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restricted_routes = Some(routes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_label_length(mut self, max: usize) -> Self {
        self.max_label_length = Some(max);
        self
    }

    pub fn with_format_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &RouteContext) -> CallbackResult<String> + Send + Sync + 'static,
    {
        self.format_label = Some(Arc::new(f));
        self
    }

    pub fn with_skip<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &RouteContext) -> CallbackResult<bool> + Send + Sync + 'static,
    {
        self.should_skip_segment = Some(Arc::new(f));
        self
    }

    pub fn with_id_generator<F>(mut self, f: F) -> Self
    where
        F: Fn(&BreadcrumbItem, usize) -> CallbackResult<String> + Send + Sync + 'static,
    {
        self.generate_id = Some(Arc::new(f));
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl fmt::Debug for BreadcrumbOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreadcrumbOptions")
            .field("show_on_home", &self.show_on_home)
            .field("custom_routes", &self.custom_routes)
            .field("locales", &self.locales)
            .field("restricted_routes", &self.restricted_routes)
            .field("max_label_length", &self.max_label_length)
            .field("format_label", &self.format_label.is_some())
            .field("should_skip_segment", &self.should_skip_segment.is_some())
            .field("generate_id", &self.generate_id.is_some())
            .field("plugins", &self.plugins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_labels_resolve() {
        assert_eq!(
            RouteLabel::Text("Shop".into()).resolve("/shop").unwrap(),
            "Shop"
        );
        let computed = CustomRoute::computed(|prefix| Ok(format!("at {prefix}")));
        assert_eq!(computed.label.resolve("/a/b").unwrap(), "at /a/b");
    }

    #[test]
    fn resolver_marks_route_async() {
        let route = CustomRoute::new("Product")
            .with_resolver(|_segment, _ctx| async { Ok::<_, BoxError>(RouteOverride::label("Resolved")) });
        assert!(route.is_async);
        assert!(route.resolver.is_some());
    }

    #[test]
    fn route_config_conversion() {
        let config = RouteConfig {
            label: "Our Products".into(),
            icon: Some("bag".into()),
            disabled: true,
            hidden: false,
        };
        let route = CustomRoute::from(&config);
        assert!(matches!(route.label, RouteLabel::Text(ref t) if t == "Our Products"));
        assert_eq!(route.icon.as_deref(), Some("bag"));
        assert!(route.disabled);
        assert!(!route.is_async);
    }

    #[test]
    fn engine_options_from_app_config() {
        let mut app = AppConfig {
            locale: "fr".into(),
            ..AppConfig::default()
        };
        app.translations.insert("home".into(), "Accueil".into());
        app.regions.insert("us".into(), "États-Unis".into());

        let options = EngineOptions::from(&app);
        assert_eq!(options.locale.as_deref(), Some("fr"));
        assert_eq!(options.translations.get("home"), "Accueil");
        let lookup = options.display_names.expect("regions become a display-name service");
        assert_eq!(lookup("US", "fr").as_deref(), Some("États-Unis"));
        assert_eq!(lookup("DE", "fr"), None);
    }

    #[test]
    fn builder_collects_overrides() {
        let options = BreadcrumbOptions::new()
            .show_on_home(true)
            .with_locales(["en"])
            .with_restricted_routes(["admin"])
            .with_max_label_length(12)
            .with_route("products", CustomRoute::new("Shop"));
        assert!(options.show_on_home);
        assert_eq!(options.locales.as_deref(), Some(&["en".to_string()][..]));
        assert_eq!(options.restricted_routes, Some(vec!["admin".to_string()]));
        assert_eq!(options.max_label_length, Some(12));
        assert!(options.custom_routes.contains_key("products"));
    }
}
