//! Configuration for Crumbtrail.
//!
//! User config lives at `~/.crumbtrail/crumbtrail.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CrumbtrailError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "crumbtrail.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".crumbtrail";

// ---------------------------------------------------------------------------
// Engine config
// ---------------------------------------------------------------------------

/// Resolved engine configuration. Every field is always populated;
/// missing TOML keys fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Locale codes stripped from paths (matched case-insensitively).
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Segments suppressed when they form the whole path.
    #[serde(default = "default_restricted_routes")]
    pub restricted_routes: Vec<String>,

    /// Segments never treated as dynamic.
    #[serde(default = "default_static_routes")]
    pub static_routes: Vec<String>,

    /// Labels longer than this are truncated with an ellipsis.
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,

    /// Extra classification patterns, merged with the built-ins.
    #[serde(default)]
    pub dynamic_patterns: Vec<PatternConfig>,

    /// Memoize generated trails per path + relevant options.
    #[serde(default = "default_true")]
    pub enable_cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            restricted_routes: default_restricted_routes(),
            static_routes: default_static_routes(),
            max_label_length: default_max_label_length(),
            dynamic_patterns: Vec::new(),
            enable_cache: true,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_locales() -> Vec<String> {
    strings(&[
        "en", "ar", "fr", "es", "de", "it", "pt", "ru", "ja", "ko", "zh", "hi", "ur",
    ])
}
fn default_restricted_routes() -> Vec<String> {
    strings(&["products", "categories", "collections"])
}
fn default_static_routes() -> Vec<String> {
    strings(&[
        "dashboard", "settings", "profile", "admin", "blog", "about", "contact",
    ])
}
fn default_max_label_length() -> usize {
    30
}
fn default_true() -> bool {
    true
}

/// A classification pattern declared in configuration (regex source form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Pattern identifier, e.g. `sku`.
    pub name: String,
    /// Regular expression matched against a single segment.
    pub pattern: String,
    /// Higher wins when several patterns match.
    #[serde(default)]
    pub priority: i32,
}

// ---------------------------------------------------------------------------
// App config (matching crumbtrail.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Locale tag used for display-name lookups.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Translation overrides (`home`, `details`, ...).
    #[serde(default)]
    pub translations: BTreeMap<String, String>,

    /// Two-letter region code → display name.
    #[serde(default)]
    pub regions: BTreeMap<String, String>,

    /// Static per-segment overrides.
    #[serde(default)]
    pub routes: BTreeMap<String, RouteConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            engine: EngineConfig::default(),
            translations: BTreeMap::new(),
            regions: BTreeMap::new(),
            routes: BTreeMap::new(),
        }
    }
}

fn default_locale() -> String {
    "en".into()
}

/// `[routes.<segment>]` entry: a static custom route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.crumbtrail/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CrumbtrailError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.crumbtrail/crumbtrail.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CrumbtrailError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CrumbtrailError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CrumbtrailError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = render_config(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| CrumbtrailError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Serialize a config as pretty TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| CrumbtrailError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let toml_str = render_config(&AppConfig::default()).expect("serialize default config");
        assert!(toml_str.contains("max_label_length = 30"));
        assert!(toml_str.contains("restricted_routes"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = render_config(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.engine, EngineConfig::default());
        assert_eq!(parsed.locale, "en");
    }

    #[test]
    fn partial_engine_section_keeps_defaults() {
        let toml_str = r#"
[engine]
locales = ["en"]
enable_cache = false

[[engine.dynamic_patterns]]
name = "sku"
pattern = "^SKU\\d+$"
priority = 95
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.engine.locales, vec!["en".to_string()]);
        assert!(!config.engine.enable_cache);
        assert_eq!(config.engine.max_label_length, 30);
        assert_eq!(config.engine.static_routes.len(), 7);
        assert_eq!(config.engine.dynamic_patterns[0].priority, 95);
    }

    #[test]
    fn config_with_routes_and_regions() {
        let toml_str = r#"
locale = "fr"

[translations]
home = "Accueil"

[regions]
US = "États-Unis"

[routes.products]
label = "Our Products"
icon = "bag"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.locale, "fr");
        assert_eq!(config.translations["home"], "Accueil");
        assert_eq!(config.regions["US"], "États-Unis");
        assert_eq!(config.routes["products"].icon.as_deref(), Some("bag"));
        assert!(!config.routes["products"].hidden);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/crumbtrail.toml")).unwrap_err();
        assert!(matches!(err, CrumbtrailError::Io { .. }));
    }
}
