//! Integration tests for the edge proxy and the workflow runner.
//!
//! These exercise the real HTTP stack: a tandem server bound to an
//! ephemeral port, talking to scripted upstreams. Transport-level failures
//! are produced by a raw TCP acceptor that drops connections, so attempts
//! stay countable; everything else uses an axum mock upstream.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::{header, StatusCode};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use tandem_core::models::DemoTask;
use tandem_core::{ApiClient, Config, TimelineStore, WorkflowKind, WorkflowRunner};
use tandem_server::state::{AppState, AppStateInner};
use tandem_server::{start_server_with_state, ServerConfig};

/// Start a proxy pointed at the given upstream, on an ephemeral port.
async fn start_proxy(upstream_url: String, api_key: Option<&str>) -> SocketAddr {
    let config = Config {
        upstream_url,
        api_key: api_key.map(|s| s.to_string()),
        model: "groq-1".to_string(),
        upstream_timeout: Duration::from_secs(5),
        api_base_url: String::new(),
    };
    let state: AppState = Arc::new(AppStateInner::new(config));
    start_server_with_state(
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        state,
    )
    .await
    .expect("Failed to start proxy server")
}

/// An axum mock upstream with a fixed reply, counting hits and capturing
/// request payloads.
struct MockUpstream {
    url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let requests: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));

    let handler_hits = hits.clone();
    let handler_requests = requests.clone();
    let app = axum::Router::new().route(
        "/",
        axum::routing::post(move |axum::Json(payload): axum::Json<Value>| {
            let hits = handler_hits.clone();
            let requests = handler_requests.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                requests.lock().unwrap().push(payload);
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    MockUpstream {
        url: format!("http://{}/", addr),
        hits,
        requests,
    }
}

/// An upstream that echoes the request's `input` back as a one-step
/// timeline, for ordering tests.
async fn echo_workflow_upstream() -> String {
    let app = axum::Router::new().route(
        "/",
        axum::routing::post(|axum::Json(payload): axum::Json<Value>| async move {
            let input = payload["input"].as_str().unwrap_or("").to_string();
            axum::Json(serde_json::json!({
                "timeline": [{ "agent": "Planner", "text": input }]
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}/", addr)
}

/// A raw TCP upstream that drops the first `drops` connections without an
/// HTTP response (transport failure), then answers with the given reply.
/// Returns the URL and the accepted-connection counter.
async fn flaky_upstream(drops: usize, status_line: &'static str, body: String) -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let (mut sock, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= drops {
                // Close without an HTTP response: transport-level failure.
                drop(sock);
                continue;
            }
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 8192];
                let _ = sock.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    (format!("http://{}/", addr), hits)
}

// ---------------------------------------------------------------------------
// Retry behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retry_recovers_after_two_transport_failures() {
    let (upstream, hits) =
        flaky_upstream(2, "200 OK", r#"{"response": "Hello!"}"#.to_string()).await;
    let proxy = start_proxy(upstream, Some("test-key")).await;

    let started = Instant::now();
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/ai", proxy))
        .json(&serde_json::json!({ "prompt": "Give me a short, professional greeting" }))
        .send()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], "Hello!");

    // Exactly three outbound connections, with 300ms + 600ms of backoff
    // before the successful third attempt.
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert!(
        elapsed >= Duration::from_millis(900),
        "expected >= 900ms of backoff, got {:?}",
        elapsed
    );
}

#[tokio::test]
async fn retry_exhaustion_returns_502_after_three_attempts() {
    let (upstream, hits) = flaky_upstream(usize::MAX, "200 OK", String::new()).await;
    let proxy = start_proxy(upstream, Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/ai", proxy))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Upstream error");
    assert!(body["details"].is_string());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn upstream_429_passes_through_verbatim_without_retry() {
    let upstream = mock_upstream(429, r#"{"error": "rate limit"}"#).await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/ai", proxy))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 429);
    assert_eq!(response.text().await.unwrap(), r#"{"error": "rate limit"}"#);
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Request shaping and error surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_credential_is_a_500_before_any_upstream_call() {
    let upstream = mock_upstream(200, "{}").await;
    let proxy = start_proxy(upstream.url.clone(), None).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/ai", proxy))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("GROQ_API_KEY"));
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_body_is_forwarded_as_the_empty_prompt() {
    let upstream = mock_upstream(200, r#"{"response": "ok"}"#).await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/ai", proxy))
        .header("Content-Type", "application/json")
        .body("this is not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let forwarded = upstream.requests.lock().unwrap()[0].clone();
    assert_eq!(forwarded["input"], "");
    assert_eq!(forwarded["model"], "groq-1");
    assert_eq!(forwarded["max_output_tokens"], 128);
}

#[tokio::test]
async fn workflow_tag_is_passed_through_upstream() {
    let upstream = mock_upstream(200, r#"{"timeline": []}"#).await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/agents/workflow", proxy))
        .json(&serde_json::json!({ "prompt": "ship it", "workflow": "triage" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let forwarded = upstream.requests.lock().unwrap()[0].clone();
    assert_eq!(forwarded["input"], "ship it");
    assert_eq!(forwarded["workflow"], "triage");
}

#[tokio::test]
async fn preflight_and_cors_headers_on_every_response() {
    let upstream = mock_upstream(200, "{}").await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;
    let client = reqwest::Client::new();

    // OPTIONS under the API namespace: 204, no body
    for path in ["/api/ai", "/api/agents/workflow", "/api/anything/else"] {
        let response = client
            .request(reqwest::Method::OPTIONS, format!("http://{}{}", proxy, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 204, "OPTIONS {}", path);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
        assert!(response.text().await.unwrap().is_empty());
    }

    // Unknown path: 404, still carrying the CORS set
    let response = client
        .get(format!("http://{}/nope", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-methods")
            .unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-headers")
            .unwrap(),
        "Content-Type, Authorization"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not found");

    // Success path carries them too
    let response = client
        .post(format!("http://{}/api/ai", proxy))
        .json(&serde_json::json!({ "prompt": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let upstream = mock_upstream(200, "{}").await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/api/health", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// Runner and demo, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn workflow_run_preserves_upstream_order_and_starts_collapsed() {
    let upstream = mock_upstream(
        200,
        r#"{"timeline": [
            {"agent": "Planner", "text": "plan"},
            {"agent": "Writer", "text": "draft"},
            {"agent": "Reviewer", "text": "critique"}
        ]}"#,
    )
    .await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;

    let store = TimelineStore::new();
    let runner = WorkflowRunner::new(
        ApiClient::with_base_url(&format!("http://{}", proxy)),
        store.clone(),
    );
    runner
        .run("write something", &WorkflowKind::Editorial)
        .await
        .unwrap();

    let entries = store.entries();
    let agents: Vec<&str> = entries.iter().map(|e| e.agent.as_str()).collect();
    assert_eq!(agents, vec!["Planner", "Writer", "Reviewer"]);
    assert!(entries.iter().all(|e| !e.expanded));
    // One shared receipt timestamp across the whole reply
    assert!(entries.iter().all(|e| e.created_at == entries[0].created_at));
    assert!(!store.is_running());
}

#[tokio::test]
async fn failed_workflow_yields_one_expanded_system_entry() {
    let upstream = mock_upstream(200, "{}").await;
    // No credential: every call fails with a configuration error body.
    let proxy = start_proxy(upstream.url.clone(), None).await;

    let store = TimelineStore::new();
    let runner = WorkflowRunner::new(
        ApiClient::with_base_url(&format!("http://{}", proxy)),
        store.clone(),
    );
    runner
        .run("write something", &WorkflowKind::Editorial)
        .await
        .unwrap();

    let entries = store.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].agent, "System");
    assert!(entries[0].expanded);
    assert!(entries[0].text.starts_with("Error: "));
}

#[tokio::test]
async fn demo_tasks_never_interleave_and_failures_do_not_abort() {
    let upstream = echo_workflow_upstream().await;
    let proxy = start_proxy(upstream, Some("test-key")).await;

    let store = TimelineStore::new();
    let runner = WorkflowRunner::new(
        ApiClient::with_base_url(&format!("http://{}", proxy)),
        store.clone(),
    );

    let tasks = vec![
        DemoTask {
            prompt: "task A".to_string(),
            workflow: WorkflowKind::Editorial,
        },
        DemoTask {
            prompt: "task B".to_string(),
            workflow: WorkflowKind::Dev,
        },
    ];
    runner.run_demo(&tasks).await.unwrap();

    let entries = store.entries();
    let shape: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.agent.as_str(), e.text.as_str()))
        .collect();
    assert_eq!(
        shape,
        vec![
            ("Task", "Task: task A (workflow: editorial)"),
            ("Planner", "task A"),
            ("Task", "Task: task B (workflow: dev)"),
            ("Planner", "task B"),
        ]
    );
    // Headers are pre-expanded, agent steps collapsed
    assert!(entries[0].expanded && entries[2].expanded);
    assert!(!entries[1].expanded && !entries[3].expanded);
    assert!(!store.is_running());
}

#[tokio::test]
async fn single_shot_completion_does_not_touch_the_timeline() {
    let upstream = mock_upstream(200, r#"{"response": "Hello!"}"#).await;
    let proxy = start_proxy(upstream.url.clone(), Some("test-key")).await;

    let store = TimelineStore::new();
    let api = ApiClient::with_base_url(&format!("http://{}", proxy));
    let reply = api
        .call_ai("Give me a short, professional greeting")
        .await
        .unwrap();

    assert_eq!(reply.response, "Hello!");
    assert!(store.is_empty());
}
