// src/checker/html.rs
// =============================================================================
// This module pulls anchor tags out of article HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, which never rejects a document: unclosed tags,
//   stray </p>, junk before <html> are all recovered the way a browser would
//
// Encoding policy for raw bytes (files, stdin, fetched pages), first match wins:
// 1. A byte order mark
// 2. The charset parameter of the Content-Type header, when there is one
// 3. <meta charset> or <meta http-equiv="Content-Type"> in the first 1024 bytes
// 4. UTF-8
// Whatever the source encoding, anchor attributes come out as UTF-8 text.
//
// Rust concepts:
// - Iterators: For walking the selected elements
// - &'static Encoding: encoding_rs hands out statics, no allocation per lookup
// =============================================================================

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, trace};

// How far into the document we look for a <meta> charset declaration
const META_PRESCAN_BYTES: usize = 1024;

/// One `<a>` element, reduced to the two attributes we classify on
///
/// `href` is kept exactly as written (after entity decoding), so it may be
/// empty, relative, or garbage. `css_class` is the raw `class` attribute,
/// possibly empty, possibly several space-separated tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorTag {
    pub href: String,
    pub css_class: String,
}

impl AnchorTag {
    pub fn new(href: impl Into<String>, css_class: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            css_class: css_class.into(),
        }
    }
}

// Extracts every anchor that has an href attribute, in document order
//
// Parameters:
//   html: the HTML content to parse (fragment or full page)
//
// Returns: Vec<AnchorTag>, empty if nothing could be recovered
//
// Example:
//   html = "<p><a class='btn' href='/docs'>Docs</a><a name='top'></a></p>"
//   result = [AnchorTag { href: "/docs", css_class: "btn" }]
//   (the second anchor has no href, so it is dropped)
pub fn extract_anchors(html: &str) -> Vec<AnchorTag> {
    // Parse the HTML into a document
    // parse_document never fails; malformed input just produces a smaller tree
    let document = Html::parse_document(html);

    // "a[href]" = all <a> tags that carry an href attribute, even href=""
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let anchors: Vec<AnchorTag> = document
        .select(&selector)
        .filter_map(|element| {
            let element = element.value();
            let href = element.attr("href")?;
            let css_class = element.attr("class").unwrap_or("");
            Some(AnchorTag::new(href, css_class))
        })
        .collect();

    trace!(count = anchors.len(), "extracted anchors");
    anchors
}

// Turns raw HTML bytes into text, honouring the encoding they declare
//
// Parameters:
//   bytes: the document as read from disk, stdin or the network
//   content_type: the HTTP Content-Type header, if the bytes came over HTTP
//
// Falls back to UTF-8 only when nothing is declared (or the label is
// unknown). Bytes that are invalid in the chosen encoding become U+FFFD
// instead of aborting the parse.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| {
            charset_from_meta(bytes)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
                // a document cannot declare UTF-16 from inside itself
                .map(Encoding::output_encoding)
        });

    let encoding = declared.unwrap_or(UTF_8);

    // decode() still lets a BOM override the declared encoding
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "replaced malformed byte sequences");
    }
    trace!(encoding = used.name(), bytes = bytes.len(), "decoded html");
    text.into_owned()
}

// Pulls the charset parameter out of a Content-Type value
//
// "text/html; charset=ISO-8859-1" -> Some("ISO-8859-1")
fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (name.trim().eq_ignore_ascii_case("charset") && !value.is_empty()).then_some(value)
    })
}

// Looks for a charset declaration in the document head
//
// The prefix is read as windows-1252 so that every byte maps to some char
// and the ASCII markup of the <meta> tag survives whatever the real encoding is.
fn charset_from_meta(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let (head, _) = WINDOWS_1252.decode_without_bom_handling(head);
    let document = Html::parse_document(&head);

    let selector = Selector::parse("meta[charset], meta[http-equiv][content]").ok()?;
    document.select(&selector).find_map(|element| {
        let element = element.value();
        if let Some(charset) = element.attr("charset") {
            let charset = charset.trim();
            return (!charset.is_empty()).then(|| charset.to_string());
        }
        let is_content_type = element
            .attr("http-equiv")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
        if !is_content_type {
            return None;
        }
        element
            .attr("content")
            .and_then(charset_from_content_type)
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_anchor() {
        let html = r#"<a href="https://www.rust-lang.org" class="ext">Rust</a>"#;
        let anchors = extract_anchors(html);
        assert_eq!(
            anchors,
            vec![AnchorTag::new("https://www.rust-lang.org", "ext")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_anchors("").is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_dropped() {
        let html = r#"<a name="top">Top</a><a href="/docs">Docs</a>"#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors, vec![AnchorTag::new("/docs", "")]);
    }

    #[test]
    fn test_empty_href_is_kept() {
        let html = r#"<a href="">Nowhere</a>"#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors, vec![AnchorTag::new("", "")]);
    }

    #[test]
    fn test_document_order() {
        let html = r#"
            <div><a href="/one">1</a></div>
            <p>text <a href="/two">2</a> <span><a href="/three">3</a></span></p>
        "#;
        let hrefs: Vec<_> = extract_anchors(html)
            .into_iter()
            .map(|a| a.href)
            .collect();
        assert_eq!(hrefs, vec!["/one", "/two", "/three"]);
    }

    #[test]
    fn test_unclosed_anchor_is_recovered() {
        let html = r#"<a href="https://other.example/x">text"#;
        let anchors = extract_anchors(html);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].href, "https://other.example/x");
    }

    #[test]
    fn test_malformed_markup_keeps_anchors() {
        let html = r#"<?xml encoding="latin1"?></p><div><table>
                      <a href="/a">a<td><a href="/b" class="x y">b"#;
        let hrefs: Vec<_> = extract_anchors(html)
            .into_iter()
            .map(|a| a.href)
            .collect();
        assert!(hrefs.contains(&"/a".to_string()));
        assert!(hrefs.contains(&"/b".to_string()));
    }

    #[test]
    fn test_comments_and_other_tags_ignored() {
        let html = r#"<!-- <a href="/hidden">x</a> --><link href="/style.css"><img src="/i.png">"#;
        assert!(extract_anchors(html).is_empty());
    }

    #[test]
    fn test_attributes_are_decoded_utf8() {
        let html = concat!(
            r#"<a href="https://exemple.fr/caf&eacute;?a=1&amp;b=2" "#,
            r#"class="lien-évité">é</a>"#
        );
        let anchors = extract_anchors(html);
        assert_eq!(anchors[0].href, "https://exemple.fr/café?a=1&b=2");
        assert_eq!(anchors[0].css_class, "lien-évité");
    }

    #[test]
    fn test_undeclared_bytes_default_to_utf8() {
        let html = "<a href=\"/r\u{e9}sum\u{e9}\" class=\"\u{e9}t\u{e9}\">x</a>";
        let anchors = extract_anchors(&decode_html(html.as_bytes(), None));
        assert_eq!(anchors[0].href, "/r\u{e9}sum\u{e9}");
        assert_eq!(anchors[0].css_class, "\u{e9}t\u{e9}");
    }

    #[test]
    fn test_meta_charset_is_honoured() {
        // 0xE9 is "é" in latin1 and not valid UTF-8 on its own
        let bytes = b"<html><head><meta charset=\"iso-8859-1\"></head>\
                      <body><a href=\"/caf\xE9\" class=\"lien-\xE9vit\xE9\">x</a></body></html>";
        let anchors = extract_anchors(&decode_html(bytes, None));
        assert_eq!(anchors[0].href, "/caf\u{e9}");
        assert_eq!(anchors[0].css_class, "lien-\u{e9}vit\u{e9}");
    }

    #[test]
    fn test_meta_http_equiv_is_honoured() {
        let bytes = b"<meta http-equiv=\"Content-Type\" \
                      content=\"text/html; charset=windows-1252\">\
                      <a href=\"/\x80\">x</a>";
        let anchors = extract_anchors(&decode_html(bytes, None));
        assert_eq!(anchors[0].href, "/\u{20ac}");
    }

    #[test]
    fn test_content_type_wins_over_meta() {
        let bytes = b"<meta charset=\"utf-8\"><a href=\"/caf\xE9\">x</a>";
        let html = decode_html(bytes, Some("text/html; charset=\"ISO-8859-1\""));
        assert_eq!(extract_anchors(&html)[0].href, "/caf\u{e9}");
    }

    #[test]
    fn test_bom_wins_over_declarations() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("<a href=\"/\u{e9}\">x</a>".as_bytes());
        let html = decode_html(&bytes, Some("text/html; charset=iso-8859-1"));
        assert_eq!(extract_anchors(&html)[0].href, "/\u{e9}");
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        let bytes = "<a href=\"/\u{e9}\">x</a>".as_bytes();
        let html = decode_html(bytes, Some("text/html; charset=bogus"));
        assert_eq!(extract_anchors(&html)[0].href, "/\u{e9}");
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(charset_from_content_type("text/html; charset=UTF-8"), Some("UTF-8"));
        assert_eq!(charset_from_content_type("text/html;Charset='latin1' "), Some("latin1"));
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_invalid_utf8_bytes_do_not_abort() {
        let mut bytes = b"<a href=\"/ok\">".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"</a><a href=\"/also\">y</a>");
        let anchors = extract_anchors(&decode_html(&bytes, None));
        assert_eq!(anchors.len(), 2);
    }
}
