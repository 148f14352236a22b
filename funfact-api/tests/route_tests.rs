//! End-to-end route tests for the Daily Fun Fact API
//!
//! Every request goes through the full router (middleware, CORS, state)
//! with recording doubles standing in for Redis and Mistral.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use funfact_api::{create_router, ApiConfig, AppState, ErrorBody, FunFactDto};
use funfact_core::{FactService, FixedClock, LlmError, ServiceConfig};
use funfact_test_utils::fixtures::{sample_fact, sample_facts, store_down, test_day, upstream_failure};
use funfact_test_utils::{RecordingLock, RecordingStore, ScriptedGenerator};
use tower::ServiceExt; // for `oneshot`

struct TestApp {
    router: Router,
    store: Arc<RecordingStore>,
    lock: Arc<RecordingLock>,
    generator: Arc<ScriptedGenerator>,
}

fn test_app(store: RecordingStore, lock: RecordingLock, generator: ScriptedGenerator) -> TestApp {
    let store = Arc::new(store);
    let lock = Arc::new(lock);
    let generator = Arc::new(generator);
    let service = Arc::new(FactService::new(
        store.clone(),
        lock.clone(),
        generator.clone(),
        Arc::new(FixedClock::new(test_day())),
        ServiceConfig::default(),
    ));

    TestApp {
        router: create_router(AppState::new(service), &ApiConfig::default()),
        store,
        lock,
        generator,
    }
}

async fn get(router: &Router, uri: &str) -> Result<(StatusCode, Vec<u8>), String> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .map_err(|e| e.to_string())?;

    let response = router
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| format!("Request failed: {:?}", e))?;

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| e.to_string())?;
    Ok((status, body.to_vec()))
}

fn detail(body: &[u8]) -> Result<String, String> {
    let error: ErrorBody = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    Ok(error.detail)
}

// ============================================================================
// GET /v1/fun-facts/today
// ============================================================================

#[tokio::test]
async fn test_today_returns_stored_fact() -> Result<(), String> {
    let app = test_app(
        RecordingStore::with_facts([sample_fact()]),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/today").await?;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(
        json,
        serde_json::json!({"date": "2024-01-15", "fact": "Octopuses have three hearts."})
    );
    assert_eq!(app.generator.calls(), 0);
    assert_eq!(app.lock.acquire_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_today_generates_and_persists_on_empty_store() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("Honey never spoils."),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/today").await?;

    assert_eq!(status, StatusCode::OK);
    let dto: FunFactDto = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(dto.date, test_day());
    assert_eq!(dto.fact, "Honey never spoils.");
    assert_eq!(app.store.put_calls(), 1);
    assert_eq!(app.lock.release_calls(), 1);

    // Second request is served from the store.
    let (status, _) = get(&app.router, "/v1/fun-facts/today").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.generator.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_today_is_404_while_lock_held_elsewhere() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::held_elsewhere(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/today").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, br#"{"detail":"Fun fact not found"}"#.to_vec());
    assert_eq!(app.generator.calls(), 0);
    assert_eq!(app.lock.release_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_today_generation_failure_is_500_and_sanitized() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::failing(upstream_failure()),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/today").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = detail(&body)?;
    assert_eq!(message, "Fun fact generation failed");
    assert!(!message.contains("upstream exploded"));
    assert_eq!(app.store.put_calls(), 0);
    assert_eq!(app.lock.release_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_today_rate_limited_is_503() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::failing(LlmError::RateLimited {
            provider: "mistral".to_string(),
            retry_after_ms: 2000,
        }),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/today").await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(detail(&body)?.contains("rate limited"));
    Ok(())
}

#[tokio::test]
async fn test_today_store_failure_is_500() -> Result<(), String> {
    let store = RecordingStore::new();
    store.fail_gets_with(store_down());
    let app = test_app(store, RecordingLock::new(), ScriptedGenerator::replying("never used"));

    let (status, body) = get(&app.router, "/v1/fun-facts/today").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = detail(&body)?;
    assert_eq!(message, "Fun fact storage is unavailable");
    assert!(!message.contains("connection refused"));
    assert_eq!(app.generator.calls(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_today_requests_generate_once() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("Wombat droppings are cube-shaped.")
            .with_delay(std::time::Duration::from_millis(50)),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            get(&router, "/v1/fun-facts/today").await
        }));
    }

    let mut ok = 0;
    for handle in handles {
        let (status, _) = handle.await.map_err(|e| e.to_string())??;
        match status {
            StatusCode::OK => ok += 1,
            StatusCode::NOT_FOUND => {}
            other => return Err(format!("unexpected status {other}")),
        }
    }

    assert!(ok >= 1);
    assert_eq!(app.generator.calls(), 1);
    assert_eq!(app.store.put_calls(), 1);
    Ok(())
}

// ============================================================================
// GET /v1/fun-facts/recent
// ============================================================================

#[tokio::test]
async fn test_recent_returns_newest_first() -> Result<(), String> {
    let app = test_app(
        RecordingStore::with_facts(sample_facts(3)),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/recent").await?;

    assert_eq!(status, StatusCode::OK);
    let facts: Vec<FunFactDto> = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    let texts: Vec<&str> = facts.iter().map(|f| f.fact.as_str()).collect();
    assert_eq!(texts, vec!["Fact number 1", "Fact number 2", "Fact number 3"]);
    assert!(facts.windows(2).all(|pair| pair[0].date > pair[1].date));
    assert_eq!(app.generator.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_recent_empty_store_is_empty_array() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/v1/fun-facts/recent").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]".to_vec());
    Ok(())
}

#[tokio::test]
async fn test_recent_is_capped_at_limit() -> Result<(), String> {
    let app = test_app(
        RecordingStore::with_facts(sample_facts(12)),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (_, body) = get(&app.router, "/v1/fun-facts/recent").await?;

    let facts: Vec<FunFactDto> = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(facts.len(), 10);
    assert_eq!(facts[0].fact, "Fact number 1");
    assert_eq!(facts[9].fact, "Fact number 10");
    Ok(())
}

#[tokio::test]
async fn test_recent_store_failure_is_500() -> Result<(), String> {
    let store = RecordingStore::new();
    store.fail_recent_with(store_down());
    let app = test_app(store, RecordingLock::new(), ScriptedGenerator::replying("never used"));

    let (status, body) = get(&app.router, "/v1/fun-facts/recent").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(detail(&body)?, "Fun fact storage is unavailable");
    Ok(())
}

// ============================================================================
// HEALTH, METRICS, OPENAPI, CORS
// ============================================================================

#[tokio::test]
async fn test_health_ping_and_live() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/health/ping").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong".to_vec());

    let (status, body) = get(&app.router, "/health/live").await?;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(json["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_health_ready_reflects_store() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/health/ready").await?;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(json["details"]["store"]["status"], "healthy");

    app.store.fail_recent_with(store_down());

    let (status, body) = get(&app.router, "/health/ready").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["details"]["store"]["status"], "unhealthy");
    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_request_counter() -> Result<(), String> {
    let app = test_app(
        RecordingStore::with_facts([sample_fact()]),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    get(&app.router, "/v1/fun-facts/today").await?;
    let (status, body) = get(&app.router, "/metrics").await?;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).map_err(|e| e.to_string())?;
    assert!(text.contains("funfact_http_requests_total"));
    assert!(text.contains("path=\"/v1/fun-facts/today\""));
    assert!(text.contains("funfact_lookups_total{outcome=\"cached\"}"));
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_is_served() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let (status, body) = get(&app.router, "/openapi.json").await?;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert!(json["paths"]["/v1/fun-facts/today"].is_object());
    assert!(json["paths"]["/v1/fun-facts/recent"].is_object());
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() -> Result<(), String> {
    let app = test_app(
        RecordingStore::new(),
        RecordingLock::new(),
        ScriptedGenerator::replying("never used"),
    );

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/v1/fun-facts/today")
        .header(header::ORIGIN, "https://facts.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .map_err(|e| e.to_string())?;

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| format!("Request failed: {:?}", e))?;

    assert_eq!(response.status(), StatusCode::OK);
    let allow_origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .ok_or("missing allow-origin header")?;
    assert_eq!(allow_origin, "*");
    assert_eq!(app.generator.calls(), 0);
    Ok(())
}
