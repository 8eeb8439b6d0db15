// src/store/mod.rs
// =============================================================================
// Persistent per-article link counts.
//
// The store is a single JSON file:
//   {
//     "articles": {
//       "12": { "total_links": 7, "external_links": 2 },
//       "15": { "total_links": 0, "external_links": 0 }
//     }
//   }
//
// Rules:
// - A missing file is an empty store (first run)
// - Counts are only ever replaced wholesale, never partially updated
// - Articles that were not re-analyzed keep their old values
//
// Writes go to a sibling temp file first and are renamed into place, so a
// crash never leaves a half-written store behind.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::checker::LinkCounts;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountStore {
    #[serde(default)]
    articles: BTreeMap<u64, LinkCounts>,
}

impl CountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the store at `path`, or returns an empty one if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no count store yet, starting empty");
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the store to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = Path::new(&tmp);

        fs::write(tmp, json).map_err(|e| Error::io(tmp, e))?;
        fs::rename(tmp, path).map_err(|e| Error::io(path, e))?;

        debug!(path = %path.display(), articles = self.articles.len(), "saved count store");
        Ok(())
    }

    pub fn get(&self, article_id: u64) -> Option<LinkCounts> {
        self.articles.get(&article_id).copied()
    }

    /// Replaces the counts for one article
    pub fn put(&mut self, article_id: u64, counts: LinkCounts) {
        self.articles.insert(article_id, counts);
    }

    /// Stored external count, 0 when the article was never analyzed
    pub fn external_links(&self, article_id: u64) -> usize {
        self.get(article_id).map_or(0, |c| c.external_links)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
