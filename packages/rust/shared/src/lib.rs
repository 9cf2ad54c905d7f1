//! Shared types, error model, and configuration for Crumbtrail.
//!
//! This crate is the foundation depended on by the other Crumbtrail crates.
//! It provides:
//! - [`CrumbtrailError`], the unified error type
//! - Domain types ([`BreadcrumbItem`], [`RouteContext`], [`RouteOverride`], [`Translations`])
//! - Configuration ([`AppConfig`], [`EngineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, EngineConfig, PatternConfig, RouteConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, render_config,
};
pub use error::{BoxError, CrumbtrailError, Result};
pub use types::{
    BreadcrumbItem, Metadata, RouteContext, RouteOverride, Translations, ValidationReport,
};
