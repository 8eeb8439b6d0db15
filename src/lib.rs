// src/lib.rs
// =============================================================================
// Library root of external-link-checker.
//
// The core is two pure functions in `checker`:
//   extract_anchors(html)                 -> Vec<AnchorTag>
//   classify(&anchors, site_host, &rule)  -> LinkCounts { total, external }
//
// Everything else (settings, the article corpus, the count store, reports)
// exists so the `elc` binary can feed the core and keep its results.
// =============================================================================

pub mod articles;
pub mod checker;
pub mod config;
pub mod error;
pub mod report;
pub mod store;

pub use error::{Error, Result};
