// src/report/mod.rs
// =============================================================================
// This module turns stored counts into something people read.
//
// Submodules:
// - stats: Per-category and site-wide totals, the dashboard sentence
// - column: The "External links" column label and numeric sorting
// - export: CSV export of articles that link out
// =============================================================================

mod column;
mod export;
mod stats;

pub use column::{article_rows, column_label, sort_rows, ArticleRow, SortOrder};
pub use export::{export_filename, write_csv, CSV_HEADER};
pub use stats::{
    aggregate_by, category_stats, dashboard_line, site_summary, summarize, GroupStats, GroupSummary,
    UNCATEGORIZED,
};
