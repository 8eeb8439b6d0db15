// src/checker/mod.rs
// =============================================================================
// This module contains the link counting engine.
//
// Submodules:
// - html: Extracts anchor tags from (possibly broken) HTML
// - classify: Decides excluded / internal / external and sums them up
// - http: Fetches the rendered page when stored content is not enough
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod classify;
mod html;
mod http;

// Re-export public items from submodules
// This lets users write `checker::classify()` instead of
// `checker::classify::classify()`
pub use classify::{
    classify, classify_anchor, href_host, ClassMatch, ExclusionRule, LinkCounts, LinkKind,
};
pub use html::{decode_html, extract_anchors, AnchorTag};
pub use http::{build_client, fetch_rendered};

// Runs the whole pipeline on one HTML document
//
// extract -> classify -> counts. Pure: same inputs, same output, every time.
pub fn analyze_html(html: &str, site_host: &str, rule: &ExclusionRule) -> LinkCounts {
    classify(&extract_anchors(html), site_host, rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_empty_html() {
        assert_eq!(
            analyze_html("", "example.com", &ExclusionRule::none()),
            LinkCounts::default()
        );
    }

    #[test]
    fn test_analyze_exclusion_scenario() {
        let html = r#"<a href="https://other.example" class="noexternal">x</a>
                      <a href="https://another.example">y</a>"#;
        let rule = ExclusionRule::new("noexternal", ClassMatch::Token);
        let counts = analyze_html(html, "example.com", &rule);
        assert_eq!(counts.total_links, 1);
        assert_eq!(counts.external_links, 1);
    }

    #[test]
    fn test_analyze_full_article() {
        let html = r##"<!DOCTYPE html>
            <html><head><title>Post</title></head>
            <body>
              <nav><a href="/">Home</a> <a href="https://example.com/blog">Blog</a></nav>
              <article>
                <p>See <a href="https://docs.rs/url">the docs</a> and
                   <a class="btn noexternal" href="https://affiliate.example/p?id=1">buy</a>.</p>
                <p><a href="#comments">Comments</a> <a>placeholder</a></p>
              </article>
            </body></html>"##;
        let rule = ExclusionRule::new("noexternal", ClassMatch::Token);
        let counts = analyze_html(html, "example.com", &rule);
        assert_eq!(counts.total_links, 4);
        assert_eq!(counts.external_links, 1);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let html = r#"<a href="https://a.example">a</a><a href="/b">b</a>
                      <a href="https://c.example" class="skip">c"#;
        let rule = ExclusionRule::new("skip", ClassMatch::Token);
        let first = analyze_html(html, "example.com", &rule);
        let second = analyze_html(html, "example.com", &rule);
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_equals_anchor_count_without_exclusion() {
        let html =
            r#"<a href="/1">1</a><a href="https://x.example">2</a><a href="mailto:a@b.c">3</a>"#;
        let counts = analyze_html(html, "example.com", &ExclusionRule::none());
        assert_eq!(counts.total_links, 3);
    }
}
