// src/config.rs
// =============================================================================
// Settings for a run: which host is "us", which class marks links to ignore,
// and a few knobs for batch analysis.
//
// Where values come from, lowest priority first:
// 1. Built-in defaults (Settings::default)
// 2. A TOML file: --config PATH, or ./elc.toml if it exists
// 3. Command-line flags / ELC_* environment variables (SettingsOverrides)
//
// Example elc.toml:
//   site_host = "example.com"
//   exclusion_class = "noexternal"
//   class_match = "token"
//   concurrency = 8
//   timeout_secs = 10
//   store = "link-counts.json"
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::checker::{ClassMatch, ExclusionRule};
use crate::error::{Error, Result};

/// Settings file looked up in the working directory when --config is absent
pub const DEFAULT_CONFIG_NAME: &str = "elc.toml";

/// Count store used when neither the file nor the CLI name one
pub const DEFAULT_STORE_NAME: &str = "link-counts.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The site's own hostname; links to any other host are external
    pub site_host: Option<String>,

    /// CSS class that removes a link from the counts; empty = none
    pub exclusion_class: String,

    /// Whole-token or substring comparison for exclusion_class
    pub class_match: ClassMatch,

    /// How many rendered pages to fetch at once
    pub concurrency: usize,

    /// Per-request timeout when fetching rendered pages
    pub timeout_secs: u64,

    /// Where per-article counts are persisted
    pub store: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_host: None,
            exclusion_class: String::new(),
            class_match: ClassMatch::Token,
            concurrency: 8,
            timeout_secs: 10,
            store: PathBuf::from(DEFAULT_STORE_NAME),
        }
    }
}

/// Values given on the command line; `None` means "keep what the file said"
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub site_host: Option<String>,
    pub exclusion_class: Option<String>,
    pub class_match: Option<ClassMatch>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub store: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from `explicit` (which must exist) or from ./elc.toml
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with_default(explicit, Path::new(DEFAULT_CONFIG_NAME))
    }

    fn load_with_default(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::parse_config(path),
            None if default_path.exists() => Self::parse_config(default_path),
            None => Ok(Self::default()),
        }
    }

    /// Reads one TOML settings file
    pub fn parse_config(path: &Path) -> Result<Self> {
        let content = read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lays command-line values over whatever was loaded from file
    pub fn apply(&mut self, overrides: SettingsOverrides) {
        if let Some(host) = overrides.site_host {
            self.site_host = Some(host);
        }
        if let Some(class) = overrides.exclusion_class {
            self.exclusion_class = class;
        }
        if let Some(mode) = overrides.class_match {
            self.class_match = mode;
        }
        if let Some(n) = overrides.concurrency {
            self.concurrency = n;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(store) = overrides.store {
            self.store = store;
        }
    }

    /// The normalised site host, or an error if none is configured
    pub fn site_host(&self) -> Result<String> {
        match self.site_host.as_deref() {
            Some(raw) => normalize_site_host(raw),
            None => Err(Error::MissingSiteHost),
        }
    }

    pub fn exclusion_rule(&self) -> ExclusionRule {
        ExclusionRule::new(self.exclusion_class.as_str(), self.class_match)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Never zero; buffer_unordered(0) would stall forever
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

// Turns whatever the user typed into the host the url crate would produce
//
// Accepts "example.com", "Example.COM:8080", "https://example.com/blog/".
// The result is lower-case and IDNA-encoded, so it compares cleanly with
// hosts pulled out of hrefs.
pub fn normalize_site_host(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidSiteHost(raw.to_string()));
    }

    let parsed = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("http://{raw}"))
    };

    match parsed.ok().as_ref().and_then(Url::host_str) {
        Some(host) if !host.is_empty() => Ok(host.to_ascii_lowercase()),
        _ => Err(Error::InvalidSiteHost(raw.to_string())),
    }
}
