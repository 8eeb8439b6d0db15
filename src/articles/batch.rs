// src/articles/batch.rs
// =============================================================================
// This module re-analyzes a whole corpus and refreshes the count store.
//
// It is what runs on first install and whenever the exclusion class
// changes: every published article is recomputed from scratch.
//
// How it works:
// 1. Pick the published articles
// 2. Get their HTML: stored content, or the rendered page over HTTP
// 3. Run extract -> classify on each one
// 4. Write the new counts; articles whose fetch failed keep their old counts
//
// Rendered fetches run concurrently (buffer_unordered), the analysis itself
// is pure and needs no locking.
//
// update_article is the single-article version, for when one article was
// just saved: only that article's entry in the store changes.
// =============================================================================

use futures::stream::{self, StreamExt};  // StreamExt gives us .buffer_unordered()
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{published, Article};
use crate::checker::{analyze_html, build_client, fetch_rendered, LinkCounts};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::store::CountStore;

/// Where an article's HTML comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentSource {
    /// The stored body, as written in the editor
    #[default]
    Raw,
    /// The page as served at the article's URL
    Rendered,
}

/// Result of analyzing one article
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub article_id: u64,
    pub result: Result<LinkCounts>,
}

/// What a batch did to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub updated: usize,
    pub skipped: usize,
}

// Analyzes every published article
//
// Returns one outcome per published article, sorted by article id.
// Fails up front only if the settings are unusable (no site host, client
// cannot be built); per-article problems land in each outcome instead.
pub async fn analyze_articles(
    articles: &[Article],
    settings: &Settings,
    source: ContentSource,
) -> Result<Vec<AnalysisOutcome>> {
    let site_host = settings.site_host()?;
    let rule = settings.exclusion_rule();

    let mut outcomes: Vec<AnalysisOutcome> = match source {
        ContentSource::Raw => published(articles)
            .map(|article| AnalysisOutcome {
                article_id: article.id,
                result: Ok(analyze_html(&article.content, &site_host, &rule)),
            })
            .collect(),
        ContentSource::Rendered => {
            let client = build_client(settings.timeout())?;

            let futures = published(articles).map(|article| {
                let client = &client;
                let site_host = site_host.as_str();
                let rule = &rule;
                async move {
                    let result = fetch_rendered(client, &article.url)
                        .await
                        .map(|html| analyze_html(&html, site_host, rule));
                    AnalysisOutcome {
                        article_id: article.id,
                        result,
                    }
                }
            });

            // run up to `concurrency` fetches at once, results arrive unordered
            stream::iter(futures)
                .buffer_unordered(settings.concurrency())
                .collect()
                .await
        }
    };

    outcomes.sort_by_key(|outcome| outcome.article_id);
    Ok(outcomes)
}

// Writes successful outcomes into the store
//
// Failed ones are logged and skipped, so the store keeps the previous
// (stale but complete) counts for those articles.
pub fn apply_outcomes(store: &mut CountStore, outcomes: Vec<AnalysisOutcome>) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for outcome in outcomes {
        match outcome.result {
            Ok(counts) => {
                debug!(
                    article = outcome.article_id,
                    total = counts.total_links,
                    external = counts.external_links,
                    "analyzed article"
                );
                store.put(outcome.article_id, counts);
                summary.updated += 1;
            }
            Err(e) => {
                warn!(
                    article = outcome.article_id,
                    error = %e,
                    "skipping article, keeping previous counts"
                );
                summary.skipped += 1;
            }
        }
    }

    summary
}

// Full re-scan: load the store, analyze, apply, save
pub async fn scan_and_store(
    articles: &[Article],
    settings: &Settings,
    source: ContentSource,
) -> Result<BatchSummary> {
    let mut store = CountStore::load(&settings.store)?;
    let outcomes = analyze_articles(articles, settings, source).await?;
    let summary = apply_outcomes(&mut store, outcomes);
    store.save(&settings.store)?;

    info!(
        updated = summary.updated,
        skipped = summary.skipped,
        store = %settings.store.display(),
        "scan finished"
    );
    Ok(summary)
}

// Re-analyzes one article by id and stores its counts
//
// Drafts are analyzed too: a saved draft gets counts ready for when it is
// published. Errors (unknown id, failed fetch) leave the store untouched.
pub async fn update_article(
    articles: &[Article],
    id: u64,
    settings: &Settings,
    source: ContentSource,
) -> Result<LinkCounts> {
    let article = articles
        .iter()
        .find(|article| article.id == id)
        .ok_or(Error::UnknownArticle(id))?;
    let site_host = settings.site_host()?;
    let rule = settings.exclusion_rule();
    let mut store = CountStore::load(&settings.store)?;

    let counts = match source {
        ContentSource::Raw => analyze_html(&article.content, &site_host, &rule),
        ContentSource::Rendered => {
            let client = build_client(settings.timeout())?;
            let html = fetch_rendered(&client, &article.url).await?;
            analyze_html(&html, &site_host, &rule)
        }
    };

    store.put(id, counts);
    store.save(&settings.store)?;

    info!(
        article = id,
        total = counts.total_links,
        external = counts.external_links,
        "article updated"
    );
    Ok(counts)
}
