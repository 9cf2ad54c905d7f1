//! Plugin hooks around trail generation and rendering.
//!
//! A plugin is a name plus up to three optional hooks. Hooks run in
//! registration order; `after_generate` and `before_render` each receive the
//! previous hook's output.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crumbtrail_shared::{BreadcrumbItem, CrumbtrailError, Result};

use crate::options::{BreadcrumbOptions, CallbackResult};

/// Runs before any path processing on a cache miss. Return value is ignored.
pub type BeforeGenerateFn =
    Arc<dyn Fn(&str, &BreadcrumbOptions) -> CallbackResult<()> + Send + Sync>;

/// Replaces the generated trail on a cache miss.
pub type AfterGenerateFn = Arc<
    dyn Fn(Vec<BreadcrumbItem>, &BreadcrumbOptions) -> CallbackResult<Vec<BreadcrumbItem>>
        + Send
        + Sync,
>;

/// Replaces the trail right before it is rendered.
pub type BeforeRenderFn =
    Arc<dyn Fn(Vec<BreadcrumbItem>) -> CallbackResult<Vec<BreadcrumbItem>> + Send + Sync>;

/// A named set of optional hooks.
#[derive(Clone)]
pub struct Plugin {
    pub name: String,
    pub before_generate: Option<BeforeGenerateFn>,
    pub after_generate: Option<AfterGenerateFn>,
    pub before_render: Option<BeforeRenderFn>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_generate: None,
            after_generate: None,
            before_render: None,
        }
    }

    pub fn on_before_generate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &BreadcrumbOptions) -> CallbackResult<()> + Send + Sync + 'static,
    {
        self.before_generate = Some(Arc::new(hook));
        self
    }

    pub fn on_after_generate<F>(mut self, hook: F) -> Self
    where
        F: Fn(Vec<BreadcrumbItem>, &BreadcrumbOptions) -> CallbackResult<Vec<BreadcrumbItem>>
            + Send
            + Sync
            + 'static,
    {
        self.after_generate = Some(Arc::new(hook));
        self
    }

    pub fn on_before_render<F>(mut self, hook: F) -> Self
    where
        F: Fn(Vec<BreadcrumbItem>) -> CallbackResult<Vec<BreadcrumbItem>> + Send + Sync + 'static,
    {
        self.before_render = Some(Arc::new(hook));
        self
    }

    fn hook_name(&self, hook: &str) -> String {
        format!("{}.{hook}", self.name)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("before_generate", &self.before_generate.is_some())
            .field("after_generate", &self.after_generate.is_some())
            .field("before_render", &self.before_render.is_some())
            .finish()
    }
}

pub(crate) fn run_before_generate(path: &str, options: &BreadcrumbOptions) -> Result<()> {
    for plugin in &options.plugins {
        if let Some(hook) = &plugin.before_generate {
            debug!(plugin = %plugin.name, "before_generate");
            hook(path, options)
                .map_err(|e| CrumbtrailError::callback(plugin.hook_name("before_generate"), e))?;
        }
    }
    Ok(())
}

pub(crate) fn run_after_generate(
    mut items: Vec<BreadcrumbItem>,
    options: &BreadcrumbOptions,
) -> Result<Vec<BreadcrumbItem>> {
    for plugin in &options.plugins {
        if let Some(hook) = &plugin.after_generate {
            debug!(plugin = %plugin.name, "after_generate");
            items = hook(items, options)
                .map_err(|e| CrumbtrailError::callback(plugin.hook_name("after_generate"), e))?;
        }
    }
    Ok(items)
}

/// Run every plugin's `before_render` hook in order. Renderers call this on
/// a generated trail just before displaying it.
pub fn apply_render_hooks(
    mut items: Vec<BreadcrumbItem>,
    plugins: &[Plugin],
) -> Result<Vec<BreadcrumbItem>> {
    for plugin in plugins {
        if let Some(hook) = &plugin.before_render {
            items = hook(items)
                .map_err(|e| CrumbtrailError::callback(plugin.hook_name("before_render"), e))?;
        }
    }
    Ok(items)
}
