// src/articles/mod.rs
// =============================================================================
// This module handles the article corpus.
//
// The publishing platform is not part of this tool; it hands us its
// articles as a JSON array instead:
//   [
//     { "id": 12, "title": "Hello", "url": "https://example.com/hello",
//       "categories": ["news"], "content": "<p>...</p>", "published": true }
//   ]
//
// Submodules:
// - batch: Re-analyzes every published article (or a single one) and updates
//   the count store
// =============================================================================

mod batch;

pub use batch::{
    analyze_articles, apply_outcomes, scan_and_store, update_article, AnalysisOutcome,
    BatchSummary, ContentSource,
};

use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

use crate::error::{Error, Result};

/// One article as exported by the publishing platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Public URL, used for rendered analysis and in exports
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Stored (unrendered) HTML body
    #[serde(default)]
    pub content: String,
    /// Drafts and private articles are never analyzed or reported
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Reads the article corpus from a JSON file
pub fn load_articles(path: &Path) -> Result<Vec<Article>> {
    let content = read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Only the articles readers can actually see
pub fn published(articles: &[Article]) -> impl Iterator<Item = &Article> {
    articles.iter().filter(|a| a.published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::TempDir;

    #[test]
    fn test_load_articles_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("articles.json");
        write(
            &path,
            r#"[
                {"id": 1, "title": "One", "url": "https://example.com/1",
                 "categories": ["news", "tech"], "content": "<a href=\"/x\">x</a>"},
                {"id": 2, "published": false}
            ]"#,
        )
        .unwrap();

        let articles = load_articles(&path).unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles[0].published);
        assert_eq!(articles[0].categories, vec!["news", "tech"]);
        assert_eq!(articles[1].title, "");
        assert!(!articles[1].published);

        let ids: Vec<u64> = published(&articles).map(|a| a.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_load_articles_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_articles(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
