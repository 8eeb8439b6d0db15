// src/main.rs
// =============================================================================
// This is the entry point of the `elc` command.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, filtered by RUST_LOG / -v)
// 3. Load settings (elc.toml + flags)
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use external_link_checker::articles::{self, ContentSource};
use external_link_checker::checker::{self, AnchorTag, LinkCounts, LinkKind};
use external_link_checker::config::Settings;
use external_link_checker::report::{self, GroupSummary, SortOrder};
use external_link_checker::store::CountStore;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so JSON and CSV on stdout stay machine-readable
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings =
        Settings::load(cli.settings.config.as_deref()).context("could not load settings")?;
    settings.apply(cli.settings.overrides());
    info!(?settings, "settings loaded");

    match cli.command {
        Commands::Analyze { input, url, list, json } => {
            handle_analyze(&settings, &input, url.as_deref(), list, json).await
        }
        Commands::Scan { articles, id, rendered, json } => {
            handle_scan(&settings, &articles, id, rendered, json).await
        }
        Commands::Report { articles, sort, json } => {
            handle_report(&settings, &articles, sort, json)
        }
        Commands::Export { articles, output } => handle_export(&settings, &articles, output),
    }
}

/// One anchor with its verdict, for `analyze --list`
#[derive(Serialize)]
struct ClassifiedAnchor<'a> {
    #[serde(flatten)]
    anchor: &'a AnchorTag,
    kind: LinkKind,
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    counts: LinkCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    anchors: Option<Vec<ClassifiedAnchor<'a>>>,
}

// Handles the 'analyze' subcommand: one document in, counts out
async fn handle_analyze(
    settings: &Settings,
    input: &Path,
    url: Option<&str>,
    list: bool,
    json: bool,
) -> Result<()> {
    let site_host = settings.site_host()?;
    let rule = settings.exclusion_rule();

    let html = match url {
        Some(url) => {
            let client = checker::build_client(settings.timeout())?;
            checker::fetch_rendered(&client, url).await?
        }
        None => read_input(input)?,
    };

    let anchors = checker::extract_anchors(&html);
    let counts = checker::classify(&anchors, &site_host, &rule);

    let classified: Vec<ClassifiedAnchor> = anchors
        .iter()
        .map(|anchor| ClassifiedAnchor {
            anchor,
            kind: checker::classify_anchor(anchor, &site_host, &rule),
        })
        .collect();

    if json {
        let output = AnalyzeOutput {
            counts,
            anchors: list.then_some(classified),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if list {
        println!("{:<10} {:<60} {:<20}", "KIND", "HREF", "CLASS");
        println!("{}", "=".repeat(92));
        for item in &classified {
            println!(
                "{:<10} {:<60} {:<20}",
                format_kind(item.kind),
                truncate(&item.anchor.href, 57),
                item.anchor.css_class
            );
        }
        println!();
    }

    println!("🔗 Total links:    {}", counts.total_links);
    println!("🌐 External links: {}", counts.external_links);
    Ok(())
}

// Reads a file, or stdin for "-", decoding it per its <meta> charset (UTF-8 if none)
fn read_input(input: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    if input == Path::new("-") {
        io::stdin()
            .read_to_end(&mut bytes)
            .context("could not read HTML from stdin")?;
    } else {
        File::open(input)
            .and_then(|mut f| f.read_to_end(&mut bytes))
            .with_context(|| format!("could not read {}", input.display()))?;
    }
    Ok(checker::decode_html(&bytes, None))
}

/// Counts for one article, for `scan --id --json`
#[derive(Serialize)]
struct ArticleUpdate {
    article_id: u64,
    #[serde(flatten)]
    counts: LinkCounts,
}

// Handles the 'scan' subcommand: recompute every published article, or just one
async fn handle_scan(
    settings: &Settings,
    articles_path: &Path,
    id: Option<u64>,
    rendered: bool,
    json: bool,
) -> Result<()> {
    let articles = articles::load_articles(articles_path)?;
    let source = if rendered {
        ContentSource::Rendered
    } else {
        ContentSource::Raw
    };

    if let Some(id) = id {
        let counts = articles::update_article(&articles, id, settings, source)
            .await
            .with_context(|| format!("could not update article {id}"))?;
        if json {
            let output = ArticleUpdate { article_id: id, counts };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("✅ Article {id} updated");
            println!("   🔗 Total links:    {}", counts.total_links);
            println!("   🌐 External links: {}", counts.external_links);
            println!("   💾 Store: {}", settings.store.display());
        }
        return Ok(());
    }

    if !json {
        println!("🔍 Analyzing {} article(s)...", articles::published(&articles).count());
    }

    let summary = articles::scan_and_store(&articles, settings, source).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("📊 Summary:");
        println!("   ✅ Updated: {}", summary.updated);
        println!("   ⚠️  Skipped (kept previous counts): {}", summary.skipped);
        println!("   💾 Store: {}", settings.store.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    articles: Vec<ReportRow<'a>>,
    site: GroupSummary,
    categories: Vec<GroupSummary>,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    #[serde(flatten)]
    row: report::ArticleRow<'a>,
    label: String,
}

// Handles the 'report' subcommand: column table, dashboard line, categories
fn handle_report(
    settings: &Settings,
    articles_path: &Path,
    sort: SortOrder,
    json: bool,
) -> Result<()> {
    let articles = articles::load_articles(articles_path)?;
    let store = CountStore::load(&settings.store)?;

    let mut rows = report::article_rows(&articles, &store);
    report::sort_rows(&mut rows, sort);
    let site = report::site_summary(&articles, &store);
    let categories = report::category_stats(&articles, &store);

    if json {
        let output = ReportOutput {
            articles: rows
                .into_iter()
                .map(|row| ReportRow {
                    label: row.label(),
                    row,
                })
                .collect(),
            site: GroupSummary::new("all", site),
            categories: categories
                .into_iter()
                .map(|(group, stats)| GroupSummary::new(group, stats))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{:<8} {:<50} {:<15}", "ID", "TITLE", "EXTERNAL LINKS");
    println!("{}", "=".repeat(75));
    for row in &rows {
        println!("{:<8} {:<50} {:<15}", row.id, truncate(row.title, 47), row.label());
    }
    println!();

    println!("📊 {}", report::dashboard_line(&site));
    println!();

    println!("{:<25} {:>9} {:>14} {:>9}", "CATEGORY", "ARTICLES", "WITH EXTERNAL", "PERCENT");
    println!("{}", "=".repeat(60));
    for (group, stats) in &categories {
        println!(
            "{:<25} {:>9} {:>14} {:>8.2}%",
            truncate(group, 22),
            stats.articles_total,
            stats.articles_with_external,
            stats.percentage_with_external()
        );
    }
    Ok(())
}

// Handles the 'export' subcommand
fn handle_export(settings: &Settings, articles_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let articles = articles::load_articles(articles_path)?;
    let store = CountStore::load(&settings.store)?;

    let path = output
        .unwrap_or_else(|| PathBuf::from(report::export_filename(Local::now().naive_local())));

    if path == Path::new("-") {
        let stdout = io::stdout();
        let rows = report::write_csv(stdout.lock(), &articles, &store)?;
        eprintln!("📄 Exported {} article(s)", rows);
        return Ok(());
    }

    let file = File::create(&path).with_context(|| format!("could not create {}", path.display()))?;
    let rows = report::write_csv(BufWriter::new(file), &articles, &store)
        .with_context(|| format!("could not write {}", path.display()))?;
    println!("📄 Exported {} article(s) to {}", rows, path.display());
    Ok(())
}

fn format_kind(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Excluded => "excluded",
        LinkKind::Internal => "internal",
        LinkKind::External => "external",
    }
}

// Shortens long values for table display, on a char boundary
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let cut: String = value.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}
