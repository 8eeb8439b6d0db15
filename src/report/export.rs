// src/report/export.rs
// =============================================================================
// CSV export of the articles that link out.
//
// Output:
//   Article ID,Title,URL,External links
//   12,Hello world,https://example.com/hello,3
//
// Only published articles with at least one stored external link are
// written. Fields containing a comma, a double quote or a line break are
// quoted, with embedded quotes doubled (RFC 4180).
// =============================================================================

use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::io::{self, Write};

use crate::articles::{published, Article};
use crate::store::CountStore;

pub const CSV_HEADER: [&str; 4] = ["Article ID", "Title", "URL", "External links"];

/// "external_links_export_20240309140507.csv" for 2024-03-09 14:05:07
pub fn export_filename(now: NaiveDateTime) -> String {
    format!("external_links_export_{}.csv", now.format("%Y%m%d%H%M%S"))
}

// Writes the export to any writer (file, stdout, Vec<u8> in tests)
//
// Returns: how many article rows were written (header not included)
pub fn write_csv<W: Write>(
    mut out: W,
    articles: &[Article],
    store: &CountStore,
) -> io::Result<usize> {
    write_record(&mut out, &CSV_HEADER)?;

    let mut rows = 0;
    for article in published(articles) {
        let external = store.external_links(article.id);
        if external < 1 {
            continue;
        }
        let id = article.id.to_string();
        let external = external.to_string();
        write_record(
            &mut out,
            &[id.as_str(), article.title.as_str(), article.url.as_str(), external.as_str()],
        )?;
        rows += 1;
    }

    out.flush()?;
    Ok(rows)
}

fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", line.join(","))
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
