use std::{io, process, sync::Arc};

use spacetraveling::{
    application::{
        blog::{BlogService, BlogSettings},
        error::AppError,
        render::{HighlightMode, RenderOptions, RenderService, RichDocumentRenderer, highlight_css},
        site::SiteGenerator,
    },
    config,
    infra::{
        content::{JsonContentFetcher, load_document},
        output::DirectorySink,
        telemetry,
    },
    presentation::views::{AskamaPageRenderer, LayoutChrome, SYNTAX_STYLESHEET_PATH},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(AppError::from)?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Build(config::BuildArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Build(_) => run_build(settings).await,
        config::Command::Render(args) => run_render(settings, args).await,
    }
}

async fn run_build(settings: config::Settings) -> Result<(), AppError> {
    let content_dir = settings.content.directory.clone();
    let output_dir = settings.build.output_dir.clone();

    info!(
        target = "spacetraveling::build",
        content_dir = %content_dir.display(),
        output_dir = %output_dir.display(),
        highlight = ?settings.render.highlight,
        "Starting build"
    );

    let fetcher = JsonContentFetcher::from_dir(&content_dir)
        .await
        .map_err(|err| AppError::from_input(err, &content_dir))?;
    let renderer = RichDocumentRenderer::new(render_options(&settings));
    let blog = BlogService::new(
        Arc::new(fetcher),
        Arc::new(renderer),
        BlogSettings {
            page_size: settings.site.page_size,
            utc_offset: settings.site.utc_offset,
        },
    );

    let chrome = LayoutChrome::for_site(settings.site.title.clone(), settings.render.highlight);
    let mut generator = SiteGenerator::new(
        blog,
        Arc::new(AskamaPageRenderer::new(chrome)),
        settings.build.concurrency.get() as usize,
    );

    if settings.render.highlight == HighlightMode::Server {
        let stylesheet = highlight_css(&settings.render.theme)
            .map_err(|err| AppError::validation(err.to_string()))?;
        generator = generator.with_asset(SYNTAX_STYLESHEET_PATH, stylesheet);
    }

    let report = generator.generate(&DirectorySink::new(output_dir)).await?;

    info!(
        target = "spacetraveling::build",
        list_pages = report.list_pages,
        post_pages = report.post_pages,
        assets = report.assets,
        "Build completed"
    );
    Ok(())
}

async fn run_render(settings: config::Settings, args: config::RenderArgs) -> Result<(), AppError> {
    let document = load_document(&args.file)
        .await
        .map_err(|err| AppError::from_input(err, &args.file))?;
    let renderer = RichDocumentRenderer::new(render_options(&settings));
    let rendered = renderer.render(&document);

    let json = serde_json::to_string_pretty(&rendered)
        .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
    println!("{json}");
    Ok(())
}

fn render_options(settings: &config::Settings) -> RenderOptions {
    RenderOptions {
        words_per_minute: settings.render.words_per_minute,
        highlight: settings.render.highlight,
    }
}
