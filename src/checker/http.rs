// src/checker/http.rs
// =============================================================================
// This module fetches the rendered version of an article over HTTP.
//
// Stored content is often not what readers see: shortcodes, embeds and
// theme widgets add links only after rendering. When asked to, we GET the
// published URL and analyze the HTML the server returns instead.
//
// Failure policy:
// - Transport errors and non-2xx statuses come back as Err
// - The caller then skips that article and keeps whatever counts it had
// - No retries, no backoff: one request per article
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: Typed errors from crate::error
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::html::decode_html;
use crate::error::{Error, Result};

// Builds the HTTP client shared by every fetch in a batch
//
// We'll reuse this client for all requests (connection pooling)
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))  // Follow up to 5 redirects
        .user_agent(concat!("external-link-checker/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::Client)
}

// Fetches one rendered page and returns its body as UTF-8 text
//
// Parameters:
//   client: shared reqwest client (borrowed)
//   url: the article's public URL
//
// The body is decoded with the charset from the Content-Type header, or from
// the page's own <meta> declaration, falling back to UTF-8 (see html::decode_html).
pub async fn fetch_rendered(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await.map_err(|source| Error::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    // Grab the header before .bytes() consumes the response
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let bytes = response.bytes().await.map_err(|source| Error::Http {
        url: url.to_string(),
        source,
    })?;

    debug!(url = %url, bytes = bytes.len(), content_type = ?content_type, "fetched rendered page");
    Ok(decode_html(&bytes, content_type.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::extract_anchors;
    use httpmock::Method::GET;
    use httpmock::MockServer;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_fetch_rendered_page() {
        let srv = MockServer::start_async().await;
        let mock = srv.mock_async(|when, then| {
            when.method(GET).path("/post/1");
            then.status(200)
                .header("content-type", "text/html")
                .body("<a href=\"https://other.example/\u{e9}\">x</a>");
        })
        .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let body = fetch_rendered(&client, &srv.url("/post/1")).await.unwrap();

        assert_eq!(mock.hits_async().await, 1);
        assert!(body.contains("https://other.example/\u{e9}"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_fetch_rendered_latin1_page() {
        let srv = MockServer::start_async().await;
        srv.mock_async(|when, then| {
            when.method(GET).path("/latin1");
            then.status(200)
                .header("content-type", "text/html; charset=iso-8859-1")
                .body(&b"<a href=\"/caf\xE9\" class=\"lien-\xE9vit\xE9\">x</a>"[..]);
        })
        .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let body = fetch_rendered(&client, &srv.url("/latin1")).await.unwrap();
        let anchors = extract_anchors(&body);

        assert_eq!(anchors[0].href, "/caf\u{e9}");
        assert_eq!(anchors[0].css_class, "lien-\u{e9}vit\u{e9}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_fetch_rendered_not_found() {
        let srv = MockServer::start_async().await;
        srv.mock_async(|when, then| {
            when.method(GET).path("/gone");
            then.status(404);
        })
        .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = fetch_rendered(&client, &srv.url("/gone")).await.unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_fetch_rendered_bad_url() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = fetch_rendered(&client, "not a url").await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}
