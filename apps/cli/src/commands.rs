//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use crumbtrail_core::{
    BreadcrumbEngine, BreadcrumbOptions, EngineOptions, apply_render_hooks,
    format_breadcrumbs_for_schema, validate_breadcrumbs, validate_config,
};
use crumbtrail_shared::{AppConfig, BreadcrumbItem, init_config, load_config, load_config_from};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Crumbtrail: breadcrumb trails for URL paths.
#[derive(Parser)]
#[command(
    name = "crumbtrail",
    version,
    about = "Generate breadcrumb trails for URL paths.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Trail output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// `Home › Products › Phones`
    Text,
    /// Breadcrumb items as JSON.
    Json,
    /// schema.org `BreadcrumbList` JSON-LD.
    Schema,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the breadcrumb trail for a path.
    Trail {
        /// URL path, e.g. `/en/products/luxury-smartphone-pro`.
        path: String,

        /// Config file (defaults to ~/.crumbtrail/crumbtrail.toml).
        #[arg(short, long, env = "CRUMBTRAIL_CONFIG")]
        config: Option<PathBuf>,

        /// Emit a lone home item for the root path.
        #[arg(long)]
        show_on_home: bool,

        /// Locale codes to strip (repeatable). Replaces the configured list.
        #[arg(short, long = "locale")]
        locales: Vec<String>,

        /// Maximum label length before truncation.
        #[arg(long)]
        max_label_length: Option<usize>,

        /// Output format.
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a breadcrumb configuration document (TOML or JSON).
    CheckConfig {
        /// File to check; `.json` files are parsed as JSON, anything else as TOML.
        file: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show {
        /// Config file to show instead of the default location.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so trail output
/// stays pipeable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "crumbtrail=info",
        1 => "crumbtrail=debug",
        _ => "crumbtrail=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Trail {
            path,
            config,
            show_on_home,
            locales,
            max_label_length,
            format,
        } => {
            let request = TrailRequest {
                show_on_home,
                locales,
                max_label_length,
                format,
            };
            cmd_trail(&path, config.as_deref(), request).await
        }
        Command::CheckConfig { file } => cmd_check_config(&file),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Per-invocation flags for `trail`.
struct TrailRequest {
    show_on_home: bool,
    locales: Vec<String>,
    max_label_length: Option<usize>,
    format: OutputFormat,
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn trail_options(config: &AppConfig, request: &TrailRequest) -> BreadcrumbOptions {
    let mut options = BreadcrumbOptions::new()
        .show_on_home(request.show_on_home)
        .with_route_configs(&config.routes);
    if !request.locales.is_empty() {
        options = options.with_locales(request.locales.iter().map(|l| l.to_lowercase()));
    }
    if let Some(max) = request.max_label_length {
        options = options.with_max_label_length(max);
    }
    options
}

async fn cmd_trail(path: &str, config_path: Option<&Path>, request: TrailRequest) -> Result<()> {
    let config = resolve_config(config_path)?;
    let engine = BreadcrumbEngine::new(EngineOptions::from(&config))?;
    let options = trail_options(&config, &request);

    let trail = engine.generate(path, &options).await?;
    let trail = apply_render_hooks(trail, &options.plugins)?;

    let report = validate_breadcrumbs(&trail);
    for error in &report.errors {
        warn!(%error, "generated trail failed validation");
    }

    info!(path, items = trail.len(), "trail generated");
    println!("{}", render_trail(&trail, request.format)?);
    Ok(())
}

fn render_trail(trail: &[BreadcrumbItem], format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Text => trail
            .iter()
            .map(|item| item.label.as_str())
            .collect::<Vec<_>>()
            .join(" › "),
        OutputFormat::Json => serde_json::to_string_pretty(trail)?,
        OutputFormat::Schema => serde_json::to_string_pretty(&format_breadcrumbs_for_schema(trail))?,
    };
    Ok(out)
}

/// Parse a config document into an untyped JSON value.
fn read_config_document(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value = if is_json {
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {} as JSON", path.display()))?
    } else {
        let parsed: toml::Value = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {} as TOML", path.display()))?;
        serde_json::to_value(parsed)?
    };
    Ok(value)
}

fn cmd_check_config(path: &Path) -> Result<()> {
    let document = read_config_document(path)?;
    let report = validate_config(&document);

    if report.valid {
        println!("{}: ok", path.display());
        return Ok(());
    }

    for error in &report.errors {
        println!("  - {error}");
    }
    Err(eyre!(
        "{} problem(s) found in {}",
        report.errors.len(),
        path.display()
    ))
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use clap::CommandFactory;
    use crumbtrail_shared::RouteConfig;

    use super::*;

    fn request(format: OutputFormat) -> TrailRequest {
        TrailRequest {
            show_on_home: false,
            locales: Vec::new(),
            max_label_length: None,
            format,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_trail_flags() {
        let cli = Cli::parse_from([
            "crumbtrail",
            "-v",
            "trail",
            "/en/products",
            "--locale",
            "en",
            "-l",
            "FR",
            "--format",
            "schema",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Trail {
                path,
                locales,
                format,
                show_on_home,
                ..
            } => {
                assert_eq!(path, "/en/products");
                assert_eq!(locales, vec!["en", "FR"]);
                assert_eq!(format, OutputFormat::Schema);
                assert!(!show_on_home);
            }
            _ => panic!("expected trail command"),
        }
    }

    #[test]
    fn trail_options_apply_routes_and_locales() {
        let config = AppConfig {
            routes: BTreeMap::from([(
                "products".to_string(),
                RouteConfig {
                    label: "Shop".into(),
                    icon: None,
                    disabled: false,
                    hidden: false,
                },
            )]),
            ..AppConfig::default()
        };
        let req = TrailRequest {
            locales: vec!["DE".into()],
            ..request(OutputFormat::Text)
        };

        let options = trail_options(&config, &req);
        assert!(options.custom_routes.contains_key("products"));
        assert_eq!(options.locales, Some(vec!["de".to_string()]));
        assert_eq!(options.max_label_length, None);
    }

    #[tokio::test]
    async fn renders_generated_trail() {
        let config = AppConfig::default();
        let engine = BreadcrumbEngine::new(EngineOptions::from(&config)).unwrap();
        let options = trail_options(&config, &request(OutputFormat::Text));
        let trail = engine
            .generate("/fr/docs/getting-started", &options)
            .await
            .unwrap();

        assert_eq!(
            render_trail(&trail, OutputFormat::Text).unwrap(),
            "Home › Docs › Getting Started"
        );

        let json: serde_json::Value =
            serde_json::from_str(&render_trail(&trail, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json[2]["current"], true);

        let schema: serde_json::Value =
            serde_json::from_str(&render_trail(&trail, OutputFormat::Schema).unwrap()).unwrap();
        assert_eq!(schema["itemListElement"][1]["item"]["@id"], "/docs");
    }

    #[test]
    fn reads_toml_and_json_documents() {
        let dir = std::env::temp_dir().join(format!("crumbtrail-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("breadcrumbs.toml");
        std::fs::write(&toml_path, "maxSlugLength = 0\n[customRoutes.a]\nicon = \"x\"\n").unwrap();
        let report = validate_config(&read_config_document(&toml_path).unwrap());
        assert_eq!(
            report.errors,
            vec![
                "maxSlugLength must be a positive number",
                "customRoutes.a.label is required",
            ]
        );

        let json_path = dir.join("breadcrumbs.json");
        std::fs::write(&json_path, r#"{"locale": "en", "animations": {"type": "fade"}}"#).unwrap();
        assert!(validate_config(&read_config_document(&json_path).unwrap()).valid);

        assert!(cmd_check_config(&toml_path).is_err());
        assert!(cmd_check_config(&json_path).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
