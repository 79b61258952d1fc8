// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search snippet provider for the history generator.
//!
//! Queries the HTML search endpoint, extracts the top result links, fetches
//! each page, and strips it down to readable text. A page that cannot be
//! fetched degrades to an inline note rather than failing the whole search.

use std::sync::OnceLock;
use std::time::Duration;

use rand::Rng;
use regex::Regex;
use tracing::{debug, warn};

use qissa_config::model::SearchConfig;
use qissa_core::QissaError;

/// Rotated across page fetches; some sites refuse a bare client.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (X11; Linux x86_64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X)",
];

/// Rendered text width for stripped pages.
const TEXT_WIDTH: usize = 100;

fn result_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"class="result__a"[^>]*href="([^"]+)""#).expect("static regex is valid")
    })
}

/// DuckDuckGo-HTML-backed search client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    top_k: usize,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, QissaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| QissaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            top_k: config.top_k,
        })
    }

    /// Search and return the top-k page texts joined by blank lines.
    pub async fn search(&self, query: &str) -> Result<String, QissaError> {
        let url = format!("{}/html/", self.base_url);
        let html = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| QissaError::Provider {
                message: format!("search request failed: {e}"),
                source: Some(Box::new(e)),
            })?
            .error_for_status()
            .map_err(|e| QissaError::Provider {
                message: format!("search endpoint rejected the query: {e}"),
                source: Some(Box::new(e)),
            })?
            .text()
            .await
            .map_err(|e| QissaError::Provider {
                message: format!("failed to read search results: {e}"),
                source: Some(Box::new(e)),
            })?;

        let links = extract_result_links(&html, self.top_k);
        debug!(query, links = links.len(), "search results extracted");

        let mut snippets = Vec::with_capacity(links.len());
        for link in links {
            match self.fetch_page_text(&link).await {
                Ok(text) => snippets.push(text),
                Err(e) => {
                    warn!(url = %link, error = %e, "result page fetch failed");
                    snippets.push(format!("(failed to retrieve {link})"));
                }
            }
        }
        Ok(snippets.join("\n\n"))
    }

    async fn fetch_page_text(&self, url: &str) -> Result<String, QissaError> {
        let ua = USER_AGENTS[rand::thread_rng().gen_range(0..USER_AGENTS.len())];
        let body = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, ua)
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)?;

        html2text::from_read(body.as_bytes(), TEXT_WIDTH).map_err(|e| QissaError::Provider {
            message: format!("failed to render page text: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn fetch_err(e: reqwest::Error) -> QissaError {
    QissaError::Provider {
        message: format!("page fetch failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Pull up to `top_k` absolute result URLs out of the search results page.
fn extract_result_links(html: &str, top_k: usize) -> Vec<String> {
    result_link_re()
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .filter(|href| href.starts_with("http"))
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn extracts_absolute_result_links_in_order() {
        let html = r#"
            <a rel="nofollow" class="result__a" href="http://one.example/page">One</a>
            <a class="result__snippet" href="http://ignored.example">snippet</a>
            <a rel="nofollow" class="result__a" href="//relative.example/skip">Two</a>
            <a rel="nofollow" class="result__a" href="https://three.example/p?x=1">Three</a>
        "#;
        let links = extract_result_links(html, 3);
        assert_eq!(
            links,
            vec![
                "http://one.example/page".to_string(),
                "https://three.example/p?x=1".to_string(),
            ]
        );
    }

    #[test]
    fn respects_top_k() {
        let html = (0..5)
            .map(|i| format!(r#"<a class="result__a" href="http://site{i}.example">r</a>"#))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(extract_result_links(&html, 2).len(), 2);
    }

    #[tokio::test]
    async fn search_fetches_and_strips_result_pages() {
        let server = MockServer::start().await;
        let page_url = format!("{}/article", server.uri());

        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "mughal history"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<a class="result__a" href="{page_url}">result</a>"#
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><p>The Mughal empire was founded by Babur.</p></body></html>",
            ))
            .mount(&server)
            .await;

        let client = SearchClient::new(&SearchConfig {
            base_url: server.uri(),
            top_k: 3,
            fetch_timeout_secs: 5,
        })
        .unwrap();

        let snippets = client.search("mughal history").await.unwrap();
        assert!(snippets.contains("founded by Babur"));
    }

    #[tokio::test]
    async fn unreachable_page_degrades_to_note() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="result__a" href="http://127.0.0.1:1/nope">dead</a>"#,
            ))
            .mount(&server)
            .await;

        let client = SearchClient::new(&SearchConfig {
            base_url: server.uri(),
            top_k: 1,
            fetch_timeout_secs: 1,
        })
        .unwrap();

        let snippets = client.search("anything").await.unwrap();
        assert!(snippets.contains("failed to retrieve"));
    }
}
