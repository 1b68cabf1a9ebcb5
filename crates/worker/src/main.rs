use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ratecmp_core::config::Settings;
use ratecmp_core::dataset::Dataset;
use ratecmp_core::news::{self, CrawlOptions, HttpSearchSource, PageFailurePolicy};
use ratecmp_core::pipeline::{build_dashboard, top_picks, FilterOptions};

mod news_export;
mod rank;

#[derive(Debug, Parser)]
#[command(name = "ratecmp_worker")]
struct Cli {
    /// Product table (CSV/TSV). Overrides RATECMP_DATA_PATH; defaults to the built-in sample.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter, score and rank products, then print the dashboard.
    Rank(rank::RankArgs),
    /// Crawl news search result pages for a keyword and write (title, link) rows as CSV.
    News(NewsArgs),
}

#[derive(Debug, Args)]
struct NewsArgs {
    #[arg(long, default_value = news::DEFAULT_KEYWORD)]
    keyword: String,

    #[arg(long, default_value_t = news::DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Output file. Writes to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log failed pages and keep going instead of aborting the crawl.
    #[arg(long)]
    skip_failed_pages: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Rank(args) => run_rank(&settings, cli.data, args),
        Command::News(args) => run_news(&settings, args).await,
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "worker run failed");
    }
    result
}

fn run_rank(settings: &Settings, data: Option<PathBuf>, args: rank::RankArgs) -> anyhow::Result<()> {
    let path = data.or_else(|| settings.data_path.clone());
    let dataset = Dataset::load(path.as_deref())?;
    let options = FilterOptions::from_products(&dataset.products);

    let request = args.to_request(&options)?;
    let view = build_dashboard(&dataset.products, &request);
    let picks = top_picks(&dataset.products, request.scorer, args.top_picks);

    tracing::info!(
        source = %dataset.source,
        rows = view.rows.len(),
        scorer = ?request.scorer,
        order = ?request.order,
        "ranked products"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let doc = serde_json::json!({ "dashboard": view, "top_picks": picks });
        serde_json::to_writer_pretty(&mut out, &doc).context("failed to write JSON output")?;
        writeln!(out)?;
    } else {
        rank::render_text(&mut out, &view, &picks)?;
    }
    Ok(())
}

async fn run_news(settings: &Settings, args: NewsArgs) -> anyhow::Result<()> {
    let source = HttpSearchSource::from_settings(settings)?;
    let opts = CrawlOptions {
        max_pages: args.max_pages,
        on_page_failure: if args.skip_failed_pages {
            PageFailurePolicy::Skip
        } else {
            PageFailurePolicy::Abort
        },
        ..CrawlOptions::from_settings(settings)
    };

    let report = news::crawl_news(&source, &args.keyword, &opts).await?;

    match &args.out {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            news_export::write_csv(file, &report.headlines)?;
            tracing::info!(path = %path.display(), rows = report.headlines.len(), "wrote headlines");
        }
        None => news_export::write_csv(std::io::stdout().lock(), &report.headlines)?,
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
