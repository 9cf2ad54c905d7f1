//! Breadcrumb engine: path → ordered trail.
//!
//! Per call the engine:
//! 1. Looks up the cache (a hit skips every plugin hook)
//! 2. Runs `before_generate` hooks
//! 3. Splits the path and drops locale segments
//! 4. Builds one item per segment (custom route → resolver → label
//!    callback → context-aware default), truncating labels
//! 5. Runs `after_generate` hooks, caches, returns
//!
//! The cache is unbounded for the engine's lifetime; call
//! [`BreadcrumbEngine::clear_cache`] to release it. The lock is held only
//! around lookup and insert, never across a resolver await, so two
//! concurrent misses on one key may both compute; the later insert wins
//! with an identical value.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crumbtrail_shared::{
    BreadcrumbItem, CrumbtrailError, EngineConfig, Metadata, Result, RouteContext, RouteOverride,
};

use crate::classifier::{NUMERIC_ID_RE, SegmentClassifier, SegmentPattern};
use crate::formatter::LabelFormatter;
use crate::options::{BreadcrumbOptions, CustomRoute, EngineOptions};
use crate::plugin::{run_after_generate, run_before_generate};

/// Id of the leading home item.
const HOME_ID: &str = "breadcrumb-home";

type TrailCache = HashMap<String, Vec<BreadcrumbItem>>;

// ---------------------------------------------------------------------------
// BreadcrumbEngine
// ---------------------------------------------------------------------------

/// Generates breadcrumb trails. Owns its classifier, formatter and cache.
#[derive(Debug)]
pub struct BreadcrumbEngine {
    config: EngineConfig,
    classifier: SegmentClassifier,
    formatter: LabelFormatter,
    cache: Mutex<TrailCache>,
}

impl BreadcrumbEngine {
    /// Build an engine, compiling the configured dynamic patterns.
    ///
    /// Fails only when a configured pattern is not a valid regex.
    pub fn new(options: EngineOptions) -> Result<Self> {
        let EngineOptions {
            config,
            patterns,
            translations,
            locale,
            display_names,
        } = options;

        let mut custom = config
            .dynamic_patterns
            .iter()
            .map(SegmentPattern::try_from)
            .collect::<Result<Vec<_>>>()?;
        custom.extend(patterns);

        let classifier = SegmentClassifier::new(custom);
        let formatter = LabelFormatter::new(translations, locale.unwrap_or_else(|| "en".into()))
            .with_display_names(display_names);

        debug!(
            patterns = classifier.patterns().len(),
            cache = config.enable_cache,
            "breadcrumb engine ready"
        );

        Ok(Self {
            config,
            classifier,
            formatter,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &SegmentClassifier {
        &self.classifier
    }

    pub fn formatter(&self) -> &LabelFormatter {
        &self.formatter
    }

    /// Generate the trail for `path`.
    ///
    /// Resolver failures are logged and ignored; any other callback failure
    /// aborts the call and nothing is cached.
    #[instrument(skip_all, fields(path = %path))]
    pub async fn generate(
        &self,
        path: &str,
        options: &BreadcrumbOptions,
    ) -> Result<Vec<BreadcrumbItem>> {
        let key = cache_key(path, options)?;

        if self.config.enable_cache {
            let cached = self.lock_cache().get(&key).cloned();
            if let Some(hit) = cached {
                debug!(items = hit.len(), "cache hit");
                return Ok(hit);
            }
        }

        run_before_generate(path, options)?;

        let settings = CallSettings::resolve(&self.config, options);
        let segments = split_segments(path, settings.locales);

        if segments.is_empty() {
            let trail = if options.show_on_home {
                vec![self.home_item(true)]
            } else {
                Vec::new()
            };
            self.store(key, &trail);
            return Ok(trail);
        }

        let mut trail = vec![self.home_item(false)];

        if segments.len() == 1 && settings.is_restricted(&segments[0]) {
            debug!(segment = %segments[0], "restricted route, home only");
            mark_current(&mut trail);
            self.store(key, &trail);
            return Ok(trail);
        }

        self.build_chain(&segments, &mut trail, options, &settings)
            .await?;
        mark_current(&mut trail);

        let trail = run_after_generate(trail, options)?;

        debug!(items = trail.len(), "trail generated");
        self.store(key, &trail);
        Ok(trail)
    }

    /// Drop every cached trail.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        debug!("breadcrumb cache cleared");
    }

    /// Number of cached trails.
    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    // -----------------------------------------------------------------------
    // Chain building
    // -----------------------------------------------------------------------

    async fn build_chain(
        &self,
        segments: &[String],
        trail: &mut Vec<BreadcrumbItem>,
        options: &BreadcrumbOptions,
        settings: &CallSettings<'_>,
    ) -> Result<()> {
        let mut pathname = String::new();

        for (index, segment) in segments.iter().enumerate() {
            pathname.push('/');
            pathname.push_str(segment);

            let context = RouteContext {
                pathname: pathname.clone(),
                segments: segments.to_vec(),
                index,
                parent: trail.last().cloned(),
            };

            if self.should_skip(segment, &context, options, settings)? {
                debug!(%segment, index, "segment skipped");
                continue;
            }

            let item = self.build_item(segment, &context, options, settings).await?;
            if item.hidden {
                debug!(%segment, "hidden segment dropped");
                continue;
            }
            trail.push(item);
        }

        Ok(())
    }

    fn should_skip(
        &self,
        segment: &str,
        context: &RouteContext,
        options: &BreadcrumbOptions,
        settings: &CallSettings<'_>,
    ) -> Result<bool> {
        match &options.should_skip_segment {
            Some(skip) => skip(segment, context)
                .map_err(|e| CrumbtrailError::callback("should_skip_segment", e)),
            None => Ok(settings.is_restricted(segment) && context.is_sole_segment()),
        }
    }

    async fn build_item(
        &self,
        segment: &str,
        context: &RouteContext,
        options: &BreadcrumbOptions,
        settings: &CallSettings<'_>,
    ) -> Result<BreadcrumbItem> {
        let resolved = match options.custom_routes.get(segment) {
            Some(route) => resolve_custom_route(segment, route, context).await?,
            None => {
                let label = match &options.format_label {
                    Some(format) => format(segment, context)
                        .map_err(|e| CrumbtrailError::callback("format_label", e))?,
                    None => self.default_label(segment, context),
                };
                ResolvedRoute::plain(label)
            }
        };

        let mut item = BreadcrumbItem {
            id: String::new(),
            label: self
                .formatter
                .truncate(&resolved.label, settings.max_label_length),
            href: context.pathname.clone(),
            current: context.index + 1 == context.segments.len(),
            icon: resolved.icon,
            disabled: resolved.disabled,
            hidden: resolved.hidden,
            metadata: resolved.metadata,
        };

        item.id = match &options.generate_id {
            Some(generate) => generate(&item, context.index)
                .map_err(|e| CrumbtrailError::callback("generate_id", e))?,
            None => format!("breadcrumb-{}-{segment}", context.index),
        };

        Ok(item)
    }

    /// Label used when neither a custom route nor a label callback applies.
    fn default_label(&self, segment: &str, context: &RouteContext) -> String {
        if !self
            .classifier
            .is_dynamic(segment, &self.config.static_routes)
        {
            return self.formatter.format_segment(segment);
        }

        match context.previous_segment() {
            "products" | "collections" | "blog" => self.classifier.format_dynamic(segment),
            "users" if NUMERIC_ID_RE.is_match(segment) => format!("User #{segment}"),
            "users" => self.classifier.format_dynamic(segment),
            _ if segment.contains('-') => self.classifier.format_dynamic(segment),
            _ => self.formatter.translate("details").to_string(),
        }
    }

    fn home_item(&self, current: bool) -> BreadcrumbItem {
        BreadcrumbItem {
            current,
            ..BreadcrumbItem::new(HOME_ID, self.formatter.translate("home"), "/")
        }
    }

    // -----------------------------------------------------------------------
    // Cache
    // -----------------------------------------------------------------------

    fn lock_cache(&self) -> MutexGuard<'_, TrailCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, key: String, trail: &[BreadcrumbItem]) {
        if self.config.enable_cache {
            self.lock_cache().insert(key, trail.to_vec());
        }
    }
}

// ---------------------------------------------------------------------------
// Custom routes
// ---------------------------------------------------------------------------

/// Item fields produced by label resolution, before truncation and id.
struct ResolvedRoute {
    label: String,
    icon: Option<String>,
    disabled: bool,
    hidden: bool,
    metadata: Option<Metadata>,
}

impl ResolvedRoute {
    fn plain(label: String) -> Self {
        Self {
            label,
            icon: None,
            disabled: false,
            hidden: false,
            metadata: None,
        }
    }

    /// Overwrite with every field the resolver returned.
    fn apply(&mut self, resolved: RouteOverride) {
        if let Some(label) = resolved.label.filter(|l| !l.is_empty()) {
            self.label = label;
        }
        if let Some(icon) = resolved.icon {
            self.icon = Some(icon);
        }
        if let Some(disabled) = resolved.disabled {
            self.disabled = disabled;
        }
        if let Some(hidden) = resolved.hidden {
            self.hidden = hidden;
        }
        if let Some(metadata) = resolved.metadata {
            self.metadata = Some(metadata);
        }
    }
}

async fn resolve_custom_route(
    segment: &str,
    route: &CustomRoute,
    context: &RouteContext,
) -> Result<ResolvedRoute> {
    let label = route.label.resolve(&context.pathname).map_err(|e| {
        CrumbtrailError::callback(format!("custom_routes.{segment}.label"), e)
    })?;

    let mut resolved = ResolvedRoute {
        label,
        icon: route.icon.clone(),
        disabled: route.disabled,
        hidden: route.hidden,
        metadata: route.metadata.clone(),
    };

    if route.is_async {
        if let Some(resolver) = &route.resolver {
            match resolver(segment.to_string(), context.clone()).await {
                Ok(data) => resolved.apply(data),
                Err(e) => warn!(%segment, error = %e, "failed to resolve route data"),
            }
        }
    }

    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Engine settings with this call's overrides applied.
struct CallSettings<'a> {
    locales: &'a [String],
    restricted_routes: &'a [String],
    max_label_length: usize,
}

impl<'a> CallSettings<'a> {
    fn resolve(config: &'a EngineConfig, options: &'a BreadcrumbOptions) -> Self {
        Self {
            locales: options
                .locales
                .as_deref()
                .unwrap_or(config.locales.as_slice()),
            restricted_routes: options
                .restricted_routes
                .as_deref()
                .unwrap_or(config.restricted_routes.as_slice()),
            max_label_length: options.max_label_length.unwrap_or(config.max_label_length),
        }
    }

    fn is_restricted(&self, segment: &str) -> bool {
        self.restricted_routes.iter().any(|r| r == segment)
    }
}

/// Non-empty `/`-separated tokens of `path`, minus locale codes.
fn split_segments(path: &str, locales: &[String]) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .filter(|s| {
            let lowered = s.to_lowercase();
            !locales.contains(&lowered)
        })
        .map(str::to_string)
        .collect()
}

/// Only the last item is current.
fn mark_current(trail: &mut [BreadcrumbItem]) {
    let last = trail.len().saturating_sub(1);
    for (i, item) in trail.iter_mut().enumerate() {
        item.current = i == last;
    }
}

/// The output-relevant subset of per-call options.
#[derive(Serialize)]
struct Fingerprint<'a> {
    show_on_home: bool,
    restricted_routes: Option<&'a [String]>,
    locales: Option<&'a [String]>,
    max_label_length: Option<usize>,
    custom_routes: Vec<&'a str>,
}

/// `<path>#<sha256 of the relevant options>`. Stable across option
/// instances; callbacks are not part of the key.
fn cache_key(path: &str, options: &BreadcrumbOptions) -> Result<String> {
    let fingerprint = Fingerprint {
        show_on_home: options.show_on_home,
        restricted_routes: options.restricted_routes.as_deref(),
        locales: options.locales.as_deref(),
        max_label_length: options.max_label_length,
        custom_routes: options.custom_routes.keys().map(String::as_str).collect(),
    };

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&fingerprint)?);
    Ok(format!("{path}#{:x}", hasher.finalize()))
}
