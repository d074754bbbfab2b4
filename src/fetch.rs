//! Remote content fetcher
//!
//! Retrieves raw HTML under adverse conditions: bounded redirects resolved
//! manually, a per-attempt wall-clock timeout, and a streaming cap on the
//! accumulated body size. The contract is total: every failure mode
//! degrades to empty content, which callers must treat as a legitimate
//! outcome rather than an error.

use futures::StreamExt;
use reqwest::header::LOCATION;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::HttpConfig;

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_redirects: u32,
    max_body_bytes: usize,
}

impl Fetcher {
    /// Build a fetcher from the HTTP policy. Redirects are disabled on the
    /// client so `Location` headers can be resolved against the current URL
    /// and counted here.
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch a URL as text. Returns an empty string on malformed URLs,
    /// connection errors, timeouts, redirect chains deeper than the cap, and
    /// unresolvable redirect targets. A body exceeding the size cap returns
    /// the truncated prefix.
    pub async fn fetch_text(&self, url: &str) -> String {
        let mut current = match Url::parse(url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => u,
            Ok(u) => {
                debug!("Refusing non-HTTP URL scheme '{}': {}", u.scheme(), url);
                return String::new();
            }
            Err(e) => {
                debug!("Malformed URL {}: {}", url, e);
                return String::new();
            }
        };

        let mut redirects = 0u32;
        loop {
            let response = match self.client.get(current.clone()).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!("Fetch failed for {}: {}", current, e);
                    return String::new();
                }
            };

            if response.status().is_redirection() {
                redirects += 1;
                if redirects > self.max_redirects {
                    debug!(
                        "Redirect cap ({}) exceeded at {}",
                        self.max_redirects, current
                    );
                    return String::new();
                }
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                current = match location.and_then(|loc| current.join(&loc).ok()) {
                    Some(next) => next,
                    None => {
                        debug!("Redirect without usable Location at {}", current);
                        return String::new();
                    }
                };
                continue;
            }

            // Status is not otherwise checked: error pages still carry
            // markup worth scanning.
            return read_body_capped(response, self.max_body_bytes).await;
        }
    }
}

/// Read a response body in chunks, stopping once `max_bytes` have
/// accumulated. Mid-stream errors degrade to empty content; hitting the cap
/// returns the prefix read so far (lossy UTF-8 at a truncated boundary).
async fn read_body_capped(response: reqwest::Response, max_bytes: usize) -> String {
    let mut body = Vec::with_capacity(max_bytes.min(64 * 1024));
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                debug!("Stream read error: {}", e);
                return String::new();
            }
        };
        let remaining = max_bytes.saturating_sub(body.len());
        if remaining == 0 {
            debug!("Response truncated at {} bytes", body.len());
            break;
        }
        let take = chunk.len().min(remaining);
        body.extend_from_slice(&chunk[..take]);
    }

    String::from_utf8_lossy(&body).into_owned()
}

/// Normalize a lead-sheet website value into a fetchable URL
/// ("owlcleaning.co.uk" -> "https://owlcleaning.co.uk").
pub fn normalize_website(website: &str) -> String {
    let website = website.trim();
    if website.starts_with("http://") || website.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}
