// src/report/column.rs
// =============================================================================
// The per-article "External links" column: its label and its sort order.
//
// Label:  "-" when an article has no external link, "YES (n)" otherwise.
// Sort:   numeric on the stored external count; never-analyzed articles
//         sort as 0, ties broken by article id so output is stable.
// =============================================================================

use serde::Serialize;

use crate::articles::{published, Article};
use crate::checker::LinkCounts;
use crate::store::CountStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// One article as it appears in the report table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRow<'a> {
    pub id: u64,
    pub title: &'a str,
    pub url: &'a str,
    /// None if the article has never been analyzed
    pub counts: Option<LinkCounts>,
}

impl ArticleRow<'_> {
    pub fn external_links(&self) -> usize {
        self.counts.map_or(0, |c| c.external_links)
    }

    pub fn label(&self) -> String {
        column_label(self.external_links())
    }
}

pub fn column_label(external_links: usize) -> String {
    if external_links > 0 {
        format!("YES ({external_links})")
    } else {
        "-".to_string()
    }
}

/// Joins published articles with their stored counts
pub fn article_rows<'a>(articles: &'a [Article], store: &CountStore) -> Vec<ArticleRow<'a>> {
    published(articles)
        .map(|article| ArticleRow {
            id: article.id,
            title: &article.title,
            url: &article.url,
            counts: store.get(article.id),
        })
        .collect()
}

pub fn sort_rows(rows: &mut [ArticleRow<'_>], order: SortOrder) {
    rows.sort_by(|a, b| {
        let by_count = a.external_links().cmp(&b.external_links());
        let by_count = match order {
            SortOrder::Asc => by_count,
            SortOrder::Desc => by_count.reverse(),
        };
        by_count.then(a.id.cmp(&b.id))
    });
}
