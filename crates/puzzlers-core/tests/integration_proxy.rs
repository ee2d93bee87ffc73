#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use puzzlers_core::proxy::build_proxy_router;
use puzzlers_types::ProxyConfig;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "----puzzlersBoundary7MA4YWxkTrZu0gW";

fn config_for(upstream: &str) -> ProxyConfig {
    ProxyConfig { upstream_base_url: Some(upstream.to_string()), ..ProxyConfig::default() }
}

fn proxy(config: &ProxyConfig) -> TestServer {
    let router = build_proxy_router(config).expect("router builds");
    TestServer::new(router).expect("test server starts")
}

/// A multipart upload with a binary part, the shape CreatePuzzle receives.
fn multipart_body() -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [("Name", "Sphinx"), ("Solution", "man"), ("DifficultyLevel", "hard")] {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"Image\"; filename=\"p.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend((0u8..=255).cycle().take(4096));
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_content_type() -> HeaderValue {
    HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .expect("valid header")
}

#[tokio::test]
async fn test_body_bytes_forwarded_unchanged_for_every_body_method() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/Puzzels/CreatePuzzle"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&upstream)
        .await;

    let server = proxy(&config_for(&upstream.uri()));
    let body = multipart_body();

    for verb in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let response = server
            .method(verb.clone(), "/api-proxy/api/Puzzels/CreatePuzzle")
            .add_header(header::CONTENT_TYPE, multipart_content_type())
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer t0ken"))
            .bytes(body.clone().into())
            .await;
        response.assert_status_ok();
    }

    let received = upstream.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 4);
    for request in &received {
        assert_eq!(request.body.len(), body.len(), "{} body length", request.method);
        assert_eq!(request.body, body);
        assert_eq!(
            request.headers.get("content-type").expect("content-type forwarded"),
            &multipart_content_type()
        );
        assert_eq!(request.headers.get("authorization").expect("auth forwarded"), "Bearer t0ken");
    }
}

#[tokio::test]
async fn test_get_and_head_send_no_body() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/Puzzels/GetAllPuzzles"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let server = proxy(&config_for(&upstream.uri()));
    server.get("/api-proxy/api/Puzzels/GetAllPuzzles").await.assert_status_ok();
    server.method(Method::HEAD, "/api-proxy/api/Puzzels/GetAllPuzzles").await.assert_status_ok();

    let received = upstream.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 2);
    for request in &received {
        assert!(request.body.is_empty());
        assert!(request.headers.get("content-type").is_none(), "no content-type injected");
    }
}

#[tokio::test]
async fn test_json_error_status_and_body_pass_through() {
    let upstream = MockServer::start().await;
    let problem = serde_json::json!({"title": "Not Found", "status": 404, "detail": "no such puzzle"});
    Mock::given(method("GET"))
        .and(path("/api/Puzzels/GetPuzzle/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(problem.clone()))
        .mount(&upstream)
        .await;

    let response = proxy(&config_for(&upstream.uri())).get("/api-proxy/api/Puzzels/GetPuzzle/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: serde_json::Value = response.json();
    assert_eq!(json, problem);
}

#[tokio::test]
async fn test_text_reply_is_relayed_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/Register"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .set_body_string("User registered successfully"),
        )
        .mount(&upstream)
        .await;

    let response = proxy(&config_for(&upstream.uri()))
        .post("/api-proxy/api/Auth/Register")
        .json(&serde_json::json!({"Name": "ada", "Password": "pw", "Role": "Admin"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "User registered successfully");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
}

#[tokio::test]
async fn test_query_and_path_survive_prefix_stripping() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/Puzzels/GetPuzzlesByCreatorId/u%201"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = proxy(&config_for(&format!("{}/", upstream.uri())))
        .get("/api-proxy/api/Puzzels/GetPuzzlesByCreatorId/u%201?page=2")
        .await;

    response.assert_status_ok();
    let received = upstream.received_requests().await.expect("recording enabled");
    assert_eq!(received[0].url.query(), Some("page=2"));
}

#[tokio::test]
async fn test_connection_headers_are_not_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    proxy(&config_for(&upstream.uri()))
        .get("/api-proxy/api/Users")
        .add_header(header::HOST, HeaderValue::from_static("frontend.example"))
        .add_header(header::CONNECTION, HeaderValue::from_static("x-hop"))
        .add_header(HeaderName::from_static("x-hop"), HeaderValue::from_static("1"))
        .add_header(HeaderName::from_static("x-request-source"), HeaderValue::from_static("cli"))
        .await
        .assert_status_ok();

    let received = upstream.received_requests().await.expect("recording enabled");
    let headers = &received[0].headers;
    assert_ne!(headers.get("host").expect("client sets host"), "frontend.example");
    assert!(headers.get("x-hop").is_none());
    assert_eq!(headers.get("x-request-source").expect("custom header kept"), "cli");
}

#[tokio::test]
async fn test_json_reply_survives_browser_accept_encoding() {
    let upstream = MockServer::start().await;
    // A compressing backend: anything that asks for gzip gets a gzip-labelled body.
    Mock::given(header_exists("accept-encoding"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_raw(vec![0x1f, 0x8b, 0x08, 0x00, 0xde, 0xad], "application/json"),
        )
        .with_priority(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Puzzels/GetAllPuzzles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&upstream)
        .await;

    let response = proxy(&config_for(&upstream.uri()))
        .get("/api-proxy/api/Puzzels/GetAllPuzzles")
        .add_header(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"))
        .await;

    response.assert_status_ok();
    assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    let json: serde_json::Value = response.json();
    assert_eq!(json, serde_json::json!({"ok": true}));

    let received = upstream.received_requests().await.expect("recording enabled");
    assert!(received[0].headers.get("accept-encoding").is_none());
}

#[tokio::test]
async fn test_edge_cors_answers_options_locally() {
    let upstream = MockServer::start().await;
    Mock::given(method("OPTIONS"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&upstream)
        .await;

    let config = ProxyConfig { edge_cors: true, ..config_for(&upstream.uri()) };
    let server = proxy(&config);

    let preflight = server.method(Method::OPTIONS, "/api-proxy/api/Puzzels/CreatePuzzle").await;
    preflight.assert_status_ok();
    assert_eq!(preflight.text(), "");
    assert_eq!(preflight.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let response = server.get("/api-proxy/api/Puzzels/GetAllPuzzles").await;
    response.assert_status_ok();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn test_options_forwarded_without_edge_cors() {
    let upstream = MockServer::start().await;
    Mock::given(method("OPTIONS"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = proxy(&config_for(&upstream.uri())).method(Method::OPTIONS, "/api-proxy/api/x").await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_unreachable_upstream_yields_envelope() {
    let response = proxy(&config_for("http://127.0.0.1:1")).get("/api-proxy/api/Puzzels").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], "Proxy error");
    assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(json.get("trace").is_none());
}

#[tokio::test]
async fn test_trace_exposed_when_enabled() {
    let config = ProxyConfig { expose_error_trace: true, ..config_for("http://127.0.0.1:1") };
    let response = proxy(&config).post("/api-proxy/api/Auth/login").text("{}").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], "Proxy error");
    assert!(json["trace"].is_string());
}

#[tokio::test]
async fn test_malformed_json_reply_is_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&upstream)
        .await;

    let response = proxy(&config_for(&upstream.uri())).get("/api-proxy/api/Users").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
