use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a mock HTTP server that serves HTML content at the specified path.
pub async fn mock_site_page(url_path: &str, html: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock server with a redirect chain: /hop/0 redirects to /hop/1
/// and so on for `hops` redirects, with a 200 response carrying `body` at
/// the end of the chain.
pub async fn mock_redirect_chain(hops: usize, body: &str) -> MockServer {
    let server = MockServer::start().await;

    for i in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{}", i)))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", format!("/hop/{}", i + 1)),
            )
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/hop/{}", hops)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(&server)
        .await;

    server
}

/// Creates a mock server that delays responses to simulate timeouts.
pub async fn mock_timeout_server(delay_ms: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("delayed response")
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock server whose every response body is `size` bytes of 'a'.
pub async fn mock_oversized_server(size: usize) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a".repeat(size)))
        .mount(&server)
        .await;

    server
}

/// Creates a mock search endpoint serving `html` at /search for any query.
pub async fn mock_search_endpoint(html: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("hl", "en"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}
