// src/report/stats.rs
// =============================================================================
// Aggregation over already-computed per-article counts.
//
// No parsing happens here. Given counts and a grouping key (usually a
// category) we sum them up and compute the share of articles that have at
// least one external link:
//
//   percentage = articles_with_external / articles_total * 100
//
// defined as 0 for an empty group.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

use crate::articles::{published, Article};
use crate::checker::LinkCounts;
use crate::store::CountStore;

/// Group name for articles that have no category at all
pub const UNCATEGORIZED: &str = "uncategorized";

/// Totals for one group of articles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub articles_total: usize,
    pub articles_with_external: usize,
    pub total_links: usize,
    pub external_links: usize,
}

impl GroupStats {
    /// Folds one article's counts into the group
    pub fn add(&mut self, counts: LinkCounts) {
        self.articles_total += 1;
        if counts.has_external() {
            self.articles_with_external += 1;
        }
        self.total_links += counts.total_links;
        self.external_links += counts.external_links;
    }

    pub fn percentage_with_external(&self) -> f64 {
        if self.articles_total == 0 {
            return 0.0;
        }
        self.articles_with_external as f64 / self.articles_total as f64 * 100.0
    }
}

/// One line of a grouped report, ready for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: String,
    #[serde(flatten)]
    pub stats: GroupStats,
    pub percentage_with_external: f64,
}

impl GroupSummary {
    pub fn new(group: impl Into<String>, stats: GroupStats) -> Self {
        Self {
            group: group.into(),
            percentage_with_external: stats.percentage_with_external(),
            stats,
        }
    }
}

/// Sums a flat collection of counts into one group
pub fn summarize<I>(counts: I) -> GroupStats
where
    I: IntoIterator<Item = LinkCounts>,
{
    counts.into_iter().fold(GroupStats::default(), |mut stats, c| {
        stats.add(c);
        stats
    })
}

/// Sums counts per key; keys come back sorted
pub fn aggregate_by<K, I>(rows: I) -> BTreeMap<K, GroupStats>
where
    K: Ord,
    I: IntoIterator<Item = (K, LinkCounts)>,
{
    let mut groups: BTreeMap<K, GroupStats> = BTreeMap::new();
    for (key, counts) in rows {
        groups.entry(key).or_default().add(counts);
    }
    groups
}

// Site-wide totals over published articles, as shown on the dashboard
//
// Articles that were never analyzed count as having no external links.
pub fn site_summary(articles: &[Article], store: &CountStore) -> GroupStats {
    summarize(published(articles).map(|a| store.get(a.id).unwrap_or_default()))
}

// Per-category totals over published articles
//
// An article in several categories counts once in each of them.
pub fn category_stats(articles: &[Article], store: &CountStore) -> BTreeMap<String, GroupStats> {
    let rows = published(articles).flat_map(|article| {
        let counts = store.get(article.id).unwrap_or_default();
        let groups: Vec<String> = if article.categories.is_empty() {
            vec![UNCATEGORIZED.to_string()]
        } else {
            article.categories.clone()
        };
        groups.into_iter().map(move |group| (group, counts))
    });
    aggregate_by(rows)
}

/// The one-line dashboard sentence
pub fn dashboard_line(stats: &GroupStats) -> String {
    format!(
        "There are {} articles in total, of which {} ({:.2}%) have at least one external link.",
        stats.articles_total,
        stats.articles_with_external,
        stats.percentage_with_external()
    )
}
