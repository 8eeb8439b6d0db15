// src/error.rs
// =============================================================================
// Error types for the library side of the tool.
//
// The extraction/classification core never fails: bad HTML and bad hrefs
// degrade to "no anchors" or "internal". Errors only come from the parts
// around it: reading files, parsing settings, talking to the network.
//
// The binary (main.rs) wraps these in anyhow::Error with extra context.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong outside the pure counting core
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON file (article corpus or count store) is malformed
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings file is not valid TOML for our Settings struct
    #[error("invalid settings file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An article id that is not in the corpus
    #[error("no article with id {0} in the corpus")]
    UnknownArticle(u64),

    /// A command that classifies links was run without a site host
    #[error(
        "no site host configured (use --site-host, ELC_SITE_HOST or site_host in elc.toml)"
    )]
    MissingSiteHost,

    /// The configured site host could not be turned into a hostname
    #[error("invalid site host: {0:?}")]
    InvalidSiteHost(String),

    /// The shared HTTP client could not be configured
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure while fetching a rendered page
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a 2xx status
    #[error("fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

/// Shorthand used across the library
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds an `Error::Io` that remembers which file was involved
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
