// src/checker/classify.rs
// =============================================================================
// This module decides, for each anchor, whether it is excluded, internal or
// external, and folds those decisions into per-article counts.
//
// The rules:
// 1. An anchor whose class matches the exclusion rule is ignored completely
// 2. Every other anchor counts towards total_links
// 3. If its href has a host and that host is not the site host, it also
//    counts towards external_links
//
// Anything we cannot parse (empty href, "javascript:", "#top", "/about",
// "//cdn.example" without a scheme, plain garbage) has no host, so it is
// internal. Nothing in here can fail.
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use super::html::AnchorTag;

/// How the exclusion class is compared against an anchor's class attribute
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ClassMatch {
    /// The class must appear as one whole space-separated token
    #[default]
    Token,
    /// The class may appear anywhere in the attribute ("ext" matches "external")
    Substring,
}

/// Which anchors to leave out of the counts
///
/// An empty class means "exclude nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRule {
    class: String,
    mode: ClassMatch,
}

impl ExclusionRule {
    pub fn new(class: impl Into<String>, mode: ClassMatch) -> Self {
        Self {
            class: class.into().trim().to_string(),
            mode,
        }
    }

    /// A rule that never excludes anything
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_empty()
    }

    /// Returns true if an anchor with this class attribute must be skipped
    pub fn excludes(&self, css_class: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        match self.mode {
            ClassMatch::Token => css_class.split_ascii_whitespace().any(|c| c == self.class),
            ClassMatch::Substring => css_class.contains(self.class.as_str()),
        }
    }
}

/// Per-anchor decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Excluded,
    Internal,
    External,
}

/// Link totals for one article
///
/// Invariant: `external_links <= total_links`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub total_links: usize,
    pub external_links: usize,
}

impl LinkCounts {
    pub fn has_external(&self) -> bool {
        self.external_links > 0
    }

    // Adds one classified anchor to the running totals
    fn record(&mut self, kind: LinkKind) {
        match kind {
            LinkKind::Excluded => {}
            LinkKind::Internal => self.total_links += 1,
            LinkKind::External => {
                self.total_links += 1;
                self.external_links += 1;
            }
        }
    }
}

// Extracts the host of an href, if it has one
//
// Only absolute URLs have a host. Relative references fail to parse without
// a base and yield None, which is exactly what we want: they point at the
// site itself. Hosts come back lower-cased and IDNA-encoded by the url crate.
//
// Examples:
//   "https://Example.com:8080/x" -> Some("example.com")
//   "/about"                     -> None
//   "mailto:someone@example.com" -> None (no authority)
pub fn href_host(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_string()),
        _ => None,
    }
}

/// Decides what a single anchor counts as
pub fn classify_anchor(anchor: &AnchorTag, site_host: &str, rule: &ExclusionRule) -> LinkKind {
    if rule.excludes(&anchor.css_class) {
        return LinkKind::Excluded;
    }

    match href_host(&anchor.href) {
        Some(host) if !host.eq_ignore_ascii_case(site_host) => LinkKind::External,
        _ => LinkKind::Internal,
    }
}

// Reduces a list of anchors to totals
//
// Parameters:
//   anchors: output of extract_anchors (order does not matter)
//   site_host: the site's own hostname, e.g. "example.com"
//   rule: which anchors to skip entirely
//
// Returns: LinkCounts, starting from zero on every call
pub fn classify(anchors: &[AnchorTag], site_host: &str, rule: &ExclusionRule) -> LinkCounts {
    anchors
        .iter()
        .map(|anchor| classify_anchor(anchor, site_host, rule))
        .fold(LinkCounts::default(), |mut counts, kind| {
            counts.record(kind);
            counts
        })
}
