// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Settings flags are global (they work before or after the subcommand) and
// override whatever elc.toml says.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use external_link_checker::checker::ClassMatch;
use external_link_checker::config::SettingsOverrides;
use external_link_checker::report::SortOrder;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "elc",
    version,
    about = "Count internal and external links in published articles",
    long_about = "elc scans article HTML, counts hyperlinks, classifies each one as internal or \
                  external to your site, and keeps per-article counts for reports and CSV export."
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG wins if set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override values from the settings file
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Settings file (default: ./elc.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Your site's hostname; links to any other host are external
    #[arg(long, env = "ELC_SITE_HOST", global = true)]
    pub site_host: Option<String>,

    /// Links carrying this CSS class are left out of all counts
    #[arg(long, env = "ELC_EXCLUSION_CLASS", global = true)]
    pub exclude_class: Option<String>,

    /// Compare the exclusion class as a whole token or as a substring
    #[arg(long, value_enum, global = true)]
    pub class_match: Option<ClassMatch>,

    /// Count store file (default: link-counts.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Rendered pages fetched at once
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds when fetching rendered pages
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl SettingsArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            site_host: self.site_host.clone(),
            exclusion_class: self.exclude_class.clone(),
            class_match: self.class_match,
            concurrency: self.concurrency,
            timeout_secs: self.timeout,
            store: self.store.clone(),
        }
    }
}

// This enum defines our subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count the links in one HTML document
    ///
    /// Example: elc analyze post.html --site-host example.com
    Analyze {
        /// HTML file to read, or "-" for stdin
        #[arg(default_value = "-", conflicts_with = "url")]
        input: PathBuf,

        /// Fetch and analyze this page instead of reading a file
        #[arg(long)]
        url: Option<String>,

        /// Also print every anchor with its classification
        #[arg(long)]
        list: bool,

        /// Output results in JSON format instead of text
        #[arg(long)]
        json: bool,
    },

    /// Re-analyze published articles and update the count store
    ///
    /// Run it after install and whenever the exclusion class changes, or with
    /// --id after saving a single article.
    /// Example: elc scan articles.json --rendered
    Scan {
        /// Article corpus (JSON array)
        articles: PathBuf,

        /// Only re-analyze this article (drafts included); other counts are kept
        #[arg(long)]
        id: Option<u64>,

        /// Analyze the page served at each article's URL instead of its stored content
        #[arg(long)]
        rendered: bool,

        /// Output the summary in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the external-links column, the dashboard ratio and per-category stats
    Report {
        /// Article corpus (JSON array)
        articles: PathBuf,

        /// Order of the article table, by stored external link count
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        sort: SortOrder,

        /// Output results in JSON format instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Export articles with at least one external link as CSV
    Export {
        /// Article corpus (JSON array)
        articles: PathBuf,

        /// Where to write the CSV; "-" for stdout
        /// (default: external_links_export_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_settings_after_subcommand() {
        let cli = Cli::parse_from([
            "elc",
            "scan",
            "articles.json",
            "--site-host",
            "example.com",
            "--exclude-class",
            "noexternal",
            "--class-match",
            "substring",
        ]);
        let overrides = cli.settings.overrides();
        assert_eq!(overrides.site_host.as_deref(), Some("example.com"));
        assert_eq!(overrides.exclusion_class.as_deref(), Some("noexternal"));
        assert_eq!(overrides.class_match, Some(ClassMatch::Substring));
        assert!(matches!(cli.command, Commands::Scan { rendered: false, id: None, .. }));
    }

    #[test]
    fn test_scan_single_article() {
        let cli = Cli::parse_from(["elc", "scan", "articles.json", "--id", "42", "--rendered"]);
        assert!(matches!(
            cli.command,
            Commands::Scan { id: Some(42), rendered: true, .. }
        ));
    }

    #[test]
    fn test_analyze_defaults_to_stdin() {
        let cli = Cli::parse_from(["elc", "analyze"]);
        match cli.command {
            Commands::Analyze { input, url, .. } => {
                assert_eq!(input, PathBuf::from("-"));
                assert!(url.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `global = true` do?
//    - The flag is accepted anywhere on the line, before or after the
//      subcommand: `elc --site-host x scan a.json` == `elc scan a.json --site-host x`
//
// 2. What does `env = "ELC_SITE_HOST"` do?
//    - If the flag is missing, clap reads the environment variable instead
//    - Needs the 'env' feature of clap (see Cargo.toml)
//
// 3. Why Option<...> for every settings flag?
//    - None means "not given", so the value from elc.toml is kept
// -----------------------------------------------------------------------------
