//! movieslot - TMDB movie browsing CLI.

/// Application configuration (TOML).
mod config;
/// Plain-text rendering of catalog payloads.
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{ApiConfig, AppConfig, resolve_config_path};
use movieslot_api::catalog::{Catalog, SortType, sort_movies};
use movieslot_api::paging::{LocalPagingSource, Pager};
use movieslot_api::resource::Resource;
use movieslot_api::tmdb::{Category, TmdbClient};

/// Cast members shown by `movie`.
const CAST_LIMIT: usize = 10;

/// Reviews and similar movies shown by `movie`.
const LIST_LIMIT: usize = 5;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write the default config file.
    Init(InitArgs),
    /// Fetch the first page of every home category.
    Categories(CategoriesArgs),
    /// Page through a home category.
    Browse(BrowseArgs),
    /// Page through `discover/movie` results.
    Discover(PageArgs),
    /// Page through movies of a genre.
    Genre(GenreArgs),
    /// Page through movies matching a keyword.
    Keyword(KeywordArgs),
    /// List movie genres.
    Genres,
    /// Show details, credits, keywords, reviews, images and similar movies.
    Movie(MovieArgs),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `categories` subcommand.
#[derive(clap::Args)]
struct CategoriesArgs {
    /// Bypass the response cache.
    #[arg(long)]
    force: bool,
}

/// Pagination arguments shared by listing subcommands.
#[derive(clap::Args)]
struct PageArgs {
    /// Number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Sort loaded movies: release-date, rating or popularity. Server order if omitted.
    #[arg(long)]
    sort: Option<SortType>,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Category name (e.g. "Popular", "Now_Playing") or listing path.
    #[arg(long)]
    category: String,

    /// Pagination options.
    #[command(flatten)]
    paging: PageArgs,
}

/// Arguments for the `genre` subcommand.
#[derive(clap::Args)]
struct GenreArgs {
    /// TMDB genre ID (see `genres`).
    #[arg(long)]
    id: u32,

    /// Pagination options.
    #[command(flatten)]
    paging: PageArgs,
}

/// Arguments for the `keyword` subcommand.
#[derive(clap::Args)]
struct KeywordArgs {
    /// Free-text keyword.
    #[arg(long)]
    query: String,

    /// Pagination options.
    #[command(flatten)]
    paging: PageArgs,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: clap_complete::Shell,
}

/// Loads the config file, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds a TMDB client from config and the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if the token is missing, the base URL is invalid, or
/// the HTTP client fails to build.
fn build_tmdb_client(api: &ApiConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;
    let base_url = Url::parse(&api.base_url)
        .with_context(|| format!("invalid api.base_url: {}", api.base_url))?;

    let mut builder = TmdbClient::builder()
        .base_url(base_url)
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .min_interval(api.min_interval())
        .connect_timeout(api.connect_timeout())
        .read_timeout(api.read_timeout());
    if let Some(language) = api.language() {
        builder = builder.language(language);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the catalog over a configured TMDB client.
///
/// # Errors
///
/// Returns an error if config loading or client construction fails.
fn build_catalog(dir: Option<&PathBuf>) -> Result<Catalog<TmdbClient>> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.api)?;
    Ok(Catalog::new(
        Arc::new(client),
        config.paging.to_paging_config(),
    ))
}

/// Unwraps a settled resource.
///
/// # Errors
///
/// Returns an error carrying the resource's message if it failed.
fn settled<T>(resource: Resource<T>, what: &str) -> Result<T> {
    match resource {
        Resource::Success(value) => Ok(value),
        Resource::Error { message, .. } => bail!("{what} failed: {message}"),
        Resource::Loading => bail!("{what} did not complete"),
    }
}

/// Resolves a category display name, route name or listing path.
///
/// # Errors
///
/// Returns an error if `name` matches no category and is not a path.
fn resolve_category(name: &str) -> Result<String> {
    if let Some(category) = Category::from_display_name(name) {
        return Ok(category.path());
    }
    if Category::from_path(name).is_some() || name.contains('/') {
        return Ok(name.to_owned());
    }
    let known: Vec<&str> = Category::ALL.iter().map(|c| c.route_name()).collect();
    bail!("unknown category: {name} (expected one of {})", known.join(", "))
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
fn run_init(args: &InitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Runs the `categories` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or every category fails.
#[instrument(skip_all)]
async fn run_categories(args: &CategoriesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let results = catalog.fetch_all(&Category::ALL, args.force).await;

    let mut failed = 0usize;
    for (category, resource) in Category::ALL.iter().zip(&results) {
        match resource {
            Resource::Success(listing) => {
                tracing::info!("== {} ({} movies)", category, listing.movies.len());
                for movie in &listing.movies {
                    tracing::info!("{}", render::movie_line(movie));
                }
            }
            Resource::Error { message, .. } => {
                failed = failed.saturating_add(1);
                tracing::warn!("== {category}: {message}");
            }
            Resource::Loading => {}
        }
    }

    if failed == results.len() {
        bail!("all {failed} category requests failed");
    }
    Ok(())
}

/// Loads `args.pages` pages, retrying a failed page once, and prints the items.
///
/// # Errors
///
/// Returns an error if a page still fails after the retry.
async fn run_pager<S: LocalPagingSource>(
    mut pager: Pager<S>,
    args: &PageArgs,
    title: &str,
) -> Result<()> {
    for _ in 0..args.pages {
        let mut state = pager.load_more().await;
        if let Some(message) = state.error_message() {
            tracing::warn!("{title}: {message}; retrying");
            if let Some(retried) = pager.retry().await {
                state = retried;
            }
        }
        if let Some(message) = state.error_message() {
            bail!("{title}: {message}");
        }
        if state.is_end() {
            break;
        }
    }

    let mut movies = pager.snapshot().items;
    if let Some(sort) = args.sort {
        sort_movies(&mut movies, sort);
    }
    tracing::info!("== {title} ({} movies)", movies.len());
    tracing::info!("ID\tReleased\tRating\tTitle");
    for movie in &movies {
        tracing::info!("{}", render::movie_line(movie));
    }
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the category is unknown or loading fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_category(&args.category)?;
    let catalog = build_catalog(dir)?;
    let title = Category::display_name_for_path(&path).to_owned();
    run_pager(catalog.category_movies(&path), &args.paging, &title).await
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if loading fails.
#[instrument(skip_all)]
async fn run_discover(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    run_pager(catalog.discover_movies(), args, "Discover").await
}

/// Runs the `genre` subcommand.
///
/// # Errors
///
/// Returns an error if loading fails.
#[instrument(skip_all)]
async fn run_genre(args: &GenreArgs, dir: Option<&PathBuf>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let title = format!("Genre {}", args.id);
    run_pager(catalog.genre_movies(args.id), &args.paging, &title).await
}

/// Runs the `keyword` subcommand.
///
/// # Errors
///
/// Returns an error if loading fails.
#[instrument(skip_all)]
async fn run_keyword(args: &KeywordArgs, dir: Option<&PathBuf>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let title = format!("Keyword \"{}\"", args.query);
    run_pager(catalog.keyword_movies(&args.query), &args.paging, &title).await
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the genre request fails.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let genres = settled(catalog.fetch_all_genres(false).await, "genre list")?;

    tracing::info!("ID\tName");
    for genre in &genres.genres {
        tracing::info!("{}", render::genre_line(genre));
    }
    Ok(())
}

/// Runs the `movie` subcommand.
///
/// Details are required; the other sections are reported and skipped on failure.
///
/// # Errors
///
/// Returns an error if the details request fails.
#[instrument(skip_all)]
async fn run_movie(args: &MovieArgs, dir: Option<&PathBuf>) -> Result<()> {
    let catalog = build_catalog(dir)?;
    let id = args.id;

    let details = settled(catalog.fetch_movie_details(id, false).await, "movie details")?;
    let (credits, keywords, reviews, images, similar) = tokio::join!(
        catalog.fetch_credits(id),
        catalog.fetch_keywords(id),
        catalog.fetch_reviews(id, false),
        catalog.fetch_images(id),
        catalog.fetch_similar_movies(id),
    );

    for line in render::details_lines(&details) {
        tracing::info!("{line}");
    }

    match settled(credits, "credits") {
        Ok(credits) => {
            tracing::info!("Cast:");
            for member in credits.cast.iter().take(CAST_LIMIT) {
                tracing::info!("  {}", render::cast_line(member));
            }
            let directors: Vec<&str> = credits
                .crew
                .iter()
                .filter(|c| c.job == "Director")
                .map(|c| c.name.as_str())
                .collect();
            if !directors.is_empty() {
                tracing::info!("Directed by: {}", directors.join(", "));
            }
        }
        Err(err) => tracing::warn!("{err:#}"),
    }

    match settled(keywords, "keywords") {
        Ok(keywords) => {
            let names: Vec<&str> = keywords.keywords.iter().map(|k| k.name.as_str()).collect();
            tracing::info!("Keywords: {}", names.join(", "));
        }
        Err(err) => tracing::warn!("{err:#}"),
    }

    match settled(reviews, "reviews") {
        Ok(reviews) => {
            tracing::info!("Reviews ({}):", reviews.total_results.unwrap_or(0));
            for review in reviews.results.iter().take(LIST_LIMIT) {
                tracing::info!("  {}", render::review_line(review));
            }
        }
        Err(err) => tracing::warn!("{err:#}"),
    }

    match settled(images, "images") {
        Ok(images) => tracing::info!(
            "Images: {} posters, {} backdrops, {} logos",
            images.posters.len(),
            images.backdrops.len(),
            images.logos.len()
        ),
        Err(err) => tracing::warn!("{err:#}"),
    }

    match settled(similar, "similar movies") {
        Ok(similar) => {
            tracing::info!("Similar:");
            for movie in similar.results.iter().take(LIST_LIMIT) {
                tracing::info!("  {}", render::movie_line(movie));
            }
        }
        Err(err) => tracing::warn!("{err:#}"),
    }

    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "movieslot",
        &mut std::io::stdout(),
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Init(args) => run_init(&args, dir),
        Commands::Categories(args) => run_categories(&args, dir).await,
        Commands::Browse(args) => run_browse(&args, dir).await,
        Commands::Discover(args) => run_discover(&args, dir).await,
        Commands::Genre(args) => run_genre(&args, dir).await,
        Commands::Keyword(args) => run_keyword(&args, dir).await,
        Commands::Genres => run_genres(dir).await,
        Commands::Movie(args) => run_movie(&args, dir).await,
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
