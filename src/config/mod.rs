//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{io, num::NonZeroU32, path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use time::{UtcOffset, format_description::FormatItem, macros::format_description};
use tracing::level_filters::LevelFilter;

use crate::application::error::AppError;
use crate::application::render::{DEFAULT_HIGHLIGHT_THEME, DEFAULT_WORDS_PER_MINUTE, HighlightMode};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "spacetraveling";
const ENV_PREFIX: &str = "SPACETRAVELING";
const DEFAULT_SITE_TITLE: &str = "spacetraveling";
const DEFAULT_PAGE_SIZE: u32 = 2;
const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_OUTPUT_DIR: &str = "public";
const DEFAULT_BUILD_CONCURRENCY: u32 = 4;

const UTC_OFFSET_FORMAT: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

/// Command-line arguments for the spacetraveling binary.
#[derive(Debug, Parser)]
#[command(
    name = "spacetraveling",
    version,
    about = "Static blog generator for CMS rich-text content"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "SPACETRAVELING_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate the static site from a content directory.
    Build(BuildArgs),
    /// Render one document and print the result as JSON.
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct BuildArgs {
    /// Override the directory holding exported documents.
    #[arg(long = "content-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub content_dir: Option<PathBuf>,

    /// Override the directory generated pages are written to.
    #[arg(long = "output-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Override the number of post pages rendered concurrently.
    #[arg(long = "concurrency", value_name = "COUNT")]
    pub concurrency: Option<u32>,

    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Path to the document JSON file.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Override the reading speed used for read-time estimates.
    #[arg(long = "words-per-minute", value_name = "COUNT")]
    pub words_per_minute: Option<u32>,

    /// Override where code blocks are highlighted (client|server).
    #[arg(long = "highlight", value_name = "MODE")]
    pub highlight: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub site: SiteSettings,
    pub content: ContentSettings,
    pub render: RenderSettings,
    pub build: BuildSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub page_size: NonZeroU32,
    /// Offset applied before formatting publication dates.
    pub utc_offset: UtcOffset,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub words_per_minute: NonZeroU32,
    pub highlight: HighlightMode,
    pub theme: String,
}

#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub output_dir: PathBuf,
    pub concurrency: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Bad values become validation errors and a missing `--config-file` is not-found.
impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        match &err {
            LoadError::Invalid { .. } => AppError::validation(err.to_string()),
            LoadError::Build(
                ConfigError::Type { .. } | ConfigError::FileParse { .. } | ConfigError::Message(_),
            ) => AppError::validation(err.to_string()),
            LoadError::Build(ConfigError::NotFound(_)) => AppError::not_found(err.to_string()),
            LoadError::Build(ConfigError::Foreign(source)) if is_missing_file(source.as_ref()) => {
                AppError::not_found(err.to_string())
            }
            LoadError::Build(_) => {
                AppError::unexpected(format!("failed to load configuration: {err}"))
            }
        }
    }
}

fn is_missing_file(source: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    source
        .downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Build(args)) => raw.apply_build_overrides(args),
        Some(Command::Render(args)) => {
            raw.apply_render_overrides(&args.render);
            raw.apply_logging_overrides(&args.logging);
        }
        None => raw.apply_build_overrides(&BuildArgs::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    site: RawSiteSettings,
    content: RawContentSettings,
    render: RawRenderSettings,
    build: RawBuildSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_build_overrides(&mut self, args: &BuildArgs) {
        if let Some(directory) = args.content_dir.as_ref() {
            self.content.directory = Some(directory.clone());
        }
        if let Some(directory) = args.output_dir.as_ref() {
            self.build.output_dir = Some(directory.clone());
        }
        if let Some(value) = args.concurrency {
            self.build.concurrency = Some(value);
        }

        self.apply_render_overrides(&args.render);
        self.apply_logging_overrides(&args.logging);
    }

    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(value) = overrides.words_per_minute {
            self.render.words_per_minute = Some(value);
        }
        if let Some(mode) = overrides.highlight.as_ref() {
            self.render.highlight = Some(mode.clone());
        }
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            site,
            content,
            render,
            build,
            logging,
        } = raw;

        Ok(Self {
            site: build_site_settings(site)?,
            content: build_content_settings(content)?,
            render: build_render_settings(render)?,
            build: build_build_settings(build)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let title = site
        .title
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string());
    if title.is_empty() {
        return Err(LoadError::invalid("site.title", "title must not be empty"));
    }

    let page_size = non_zero_u32(site.page_size.unwrap_or(DEFAULT_PAGE_SIZE), "site.page_size")?;

    let utc_offset = match site.utc_offset {
        Some(raw) => UtcOffset::parse(raw.trim(), UTC_OFFSET_FORMAT).map_err(|err| {
            LoadError::invalid("site.utc_offset", format!("expected ±HH:MM: {err}"))
        })?,
        None => UtcOffset::UTC,
    };

    Ok(SiteSettings {
        title,
        page_size,
        utc_offset,
    })
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let directory = content
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "content.directory",
            "path must not be empty",
        ));
    }

    Ok(ContentSettings { directory })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let words_per_minute = non_zero_u32(
        render.words_per_minute.unwrap_or(DEFAULT_WORDS_PER_MINUTE),
        "render.words_per_minute",
    )?;

    let highlight = match render.highlight {
        Some(mode) => HighlightMode::from_str(mode.trim())
            .map_err(|err| LoadError::invalid("render.highlight", err.to_string()))?,
        None => HighlightMode::default(),
    };

    let theme = render
        .theme
        .unwrap_or_else(|| DEFAULT_HIGHLIGHT_THEME.to_string());
    if theme.trim().is_empty() {
        return Err(LoadError::invalid("render.theme", "theme must not be empty"));
    }

    Ok(RenderSettings {
        words_per_minute,
        highlight,
        theme,
    })
}

fn build_build_settings(build: RawBuildSettings) -> Result<BuildSettings, LoadError> {
    let output_dir = build
        .output_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    if output_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "build.output_dir",
            "path must not be empty",
        ));
    }

    let concurrency = non_zero_u32(
        build.concurrency.unwrap_or(DEFAULT_BUILD_CONCURRENCY),
        "build.concurrency",
    )?;

    Ok(BuildSettings {
        output_dir,
        concurrency,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    page_size: Option<u32>,
    utc_offset: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    words_per_minute: Option<u32>,
    highlight: Option<String>,
    theme: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBuildSettings {
    output_dir: Option<PathBuf>,
    concurrency: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

fn non_zero_u32(value: u32, key: &'static str) -> Result<NonZeroU32, LoadError> {
    NonZeroU32::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
