#![allow(clippy::unwrap_used)]
// Behavior of the `ClashReview` façade against a wiremock service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clashscope_api::TestDefinition;
use clashscope_core::{ClashReview, CoreError, OrAbsent, RunRequest, ServiceConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer, token: Option<&str>) -> ServiceConfig {
    ServiceConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        token: token.map(|t| SecretString::from(t.to_owned())),
        ..ServiceConfig::default()
    }
}

async fn setup() -> (MockServer, ClashReview) {
    let server = MockServer::start().await;
    let review = ClashReview::from_config(&config(&server, Some("Bearer test-token"))).unwrap();
    (server, review)
}

fn tests_body() -> serde_json::Value {
    json!({
        "tests": [
            { "id": "t-1", "displayName": "Walls vs Ducts" },
            { "id": "t-2", "displayName": "Beams vs Pipes" }
        ]
    })
}

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    (Arc::clone(&hits), hits)
}

// ── Memoization ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_tests_are_fetched_once_per_project() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .and(query_param("projectId", "P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .expect(1)
        .mount(&server)
        .await;

    let first = review.tests("P1").await.unwrap();
    let second = review.tests("P1").await.unwrap();

    assert_eq!(first.len(), 2);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_projects_are_cached_independently() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runs": [{ "id": "r-1" }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    review.runs("P1").await.unwrap();
    review.runs("P2").await.unwrap();
    review.runs("P1").await.unwrap();
}

#[tokio::test]
async fn test_empty_list_is_not_cached() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/suppressionRules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suppressionRules": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = review.suppression_rules("P1").await.unwrap_err();
    assert!(matches!(err, CoreError::NoData { .. }));
    assert!(review.store().cached_suppression_rules("P1").is_none());

    let again = review.suppression_rules("P1").await.or_absent().unwrap();
    assert!(again.is_none());
}

#[tokio::test]
async fn test_server_error_is_retried_and_renders_absent() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": "InternalServerError", "message": "boom" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = review.tests("P1").await.unwrap_err();
    assert!(matches!(err, CoreError::Http { status: 500, .. }));
    assert!(err.is_absent());

    assert!(review.tests("P1").await.or_absent().unwrap().is_none());
    assert!(review.store().cached_tests("P1").is_none());
}

#[tokio::test]
async fn test_cache_fill_notifies_subscribers() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .mount(&server)
        .await;

    let (seen, hits) = counter();
    let _sub = review.tests_changed().subscribe(move |snapshot| {
        assert_eq!(snapshot.as_ref().unwrap().len(), 2);
        hits.fetch_add(1, Ordering::SeqCst);
    });

    review.tests("P1").await.unwrap();
    review.tests("P1").await.unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

// ── Forced refresh ──────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_always_calls_and_publishes() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .expect(3)
        .mount(&server)
        .await;

    let (seen, hits) = counter();
    let _sub = review.tests_changed().subscribe(move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    review.tests("P1").await.unwrap();
    review.refresh_tests("P1").await.unwrap();
    review.refresh_tests("P1").await.unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_refresh_publishes_empty_list_without_caching() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tests": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (_sub, mut rx) = review.tests_changed().subscribe_channel();

    let fresh = review.refresh_tests("P1").await.unwrap();
    assert!(fresh.is_empty());
    assert!(review.store().cached_tests("P1").is_none());
    assert!(rx.recv().await.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_failure_publishes_none() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let (_sub, mut rx) = review.tests_changed().subscribe_channel();

    assert!(review.refresh_tests("P1").await.is_err());
    assert!(rx.recv().await.unwrap().is_none());
}

// ── Clash results ───────────────────────────────────────────────────

#[tokio::test]
async fn test_clash_result_follows_first_run_link() {
    let (server, review) = setup().await;
    let u1 = format!("{}/results/u1", server.uri());
    let u2 = format!("{}/results/u2", server.uri());

    Mock::given(method("GET"))
        .and(path("/runs"))
        .and(query_param("projectId", "P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runs": [
                { "id": "r-1", "_links": { "result": { "href": u1 } } },
                { "id": "r-2", "_links": { "result": { "href": u2 } } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/results/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{
                "elementAId": "0xa",
                "elementBId": "0xb",
                "elementACategoryIndex": 0,
                "center": { "x": 0.0, "y": 1.0, "z": 2.0 }
            }],
            "categoryList": [{ "id": "0x1", "displayName": "Beams" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/results/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let (seen, hits) = counter();
    let _sub = review.clashes_changed().subscribe(move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    let result = review.clash_result("P1").await.unwrap();
    let again = review.clash_result("P1").await.unwrap();

    assert!(Arc::ptr_eq(&result, &again));
    assert_eq!(result.records()[0].element_a_id, "0xa");
    assert!(Arc::ptr_eq(&review.last_viewed_result().unwrap(), &result));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    let rows = clashscope_core::ClashRow::from_result(&result);
    assert_eq!(rows[0].element_a_category, "Beams");
    assert_eq!(rows[0].suppressed_by, "N/A");
    assert_eq!(clashscope_core::clash_markers(&result).len(), 1);
}

#[tokio::test]
async fn test_clash_result_without_records_is_not_cached() {
    let (server, review) = setup().await;
    let link = format!("{}/results/pending", server.uri());

    Mock::given(method("GET"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runs": [{ "id": "r-1", "_links": { "result": { "href": link } } }]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/results/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .expect(2)
        .mount(&server)
        .await;

    assert!(review.clash_result("P1").await.or_absent().unwrap().is_none());
    assert!(review.clash_result("P1").await.or_absent().unwrap().is_none());
    assert!(review.last_viewed_result().is_none());
}

#[tokio::test]
async fn test_run_without_result_link_is_malformed() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runs": [{ "id": "r-1" }]
        })))
        .mount(&server)
        .await;

    let err = review.clash_result("P1").await.unwrap_err();
    assert!(matches!(err, CoreError::MalformedInput { .. }));
}

#[tokio::test]
async fn test_no_runs_is_no_data() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "runs": [] })))
        .mount(&server)
        .await;

    let err = review.clash_result("P1").await.unwrap_err();
    assert!(matches!(err, CoreError::NoData { .. }));
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_test_puts_once_and_leaves_caches_alone() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tests/t-1"))
        .and(body_json(serde_json::to_value(TestDefinition::update_template()).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "test": { "id": "t-1" } })))
        .expect(1)
        .mount(&server)
        .await;

    let before = review.tests("P1").await.unwrap();
    review.update_test("t-1").await.unwrap();
    let after = review.tests("P1").await.unwrap();

    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn test_start_test_run_uses_configured_default() {
    let server = MockServer::start().await;
    let review = ClashReview::from_config(&ServiceConfig {
        default_run: Some(RunRequest::new("t-1", "m-1", "v-1")),
        ..config(&server, Some("Bearer test-token"))
    })
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/runs"))
        .and(body_json(json!({
            "testId": "t-1",
            "iModelId": "m-1",
            "namedVersionId": "v-1"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "run": "r-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let started = review.start_test_run().await.unwrap();
    assert_eq!(started.run, Some(json!("r-9")));
}

#[tokio::test]
async fn test_create_test_is_scoped_to_project() {
    let (server, review) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tests"))
        .and(body_json(
            serde_json::to_value(TestDefinition::create_template("P7")).unwrap(),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "test": { "id": "t-new" } })))
        .expect(1)
        .mount(&server)
        .await;

    let created = review.create_test("P7").await.unwrap();
    assert_eq!(created["test"]["id"], "t-new");
    assert!(review.store().cached_tests("P7").is_none());
}

// ── Authorization ───────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_authorization_is_loud() {
    let server = MockServer::start().await;
    let review = ClashReview::from_config(&config(&server, None)).unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = review.tests("P1").await.unwrap_err();
    assert!(matches!(err, CoreError::AuthNotReady));
    assert!(review.tests("P1").await.or_absent().is_err());
}

#[tokio::test]
async fn test_rejected_token_renders_absent() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let err = review.tests("P1").await.unwrap_err();
    assert!(matches!(err, CoreError::Http { status: 401, .. }));
    assert!(err.is_absent());

    assert!(review.tests("P1").await.or_absent().unwrap().is_none());
    assert!(review.store().cached_tests("P1").is_none());
}

#[tokio::test]
async fn test_provider_installed_after_construction() {
    let server = MockServer::start().await;
    let review = ClashReview::from_config(&config(&server, None)).unwrap();

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .expect(1)
        .mount(&server)
        .await;

    review
        .authorization()
        .install(Arc::new(clashscope_core::StaticToken::new(
            "Bearer late".to_string().into(),
        )));
    assert_eq!(review.tests("P1").await.unwrap().len(), 2);
}

// ── Teardown ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reset_forces_refetch() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .expect(2)
        .mount(&server)
        .await;

    review.tests("P1").await.unwrap();
    review.reset();
    review.tests("P1").await.unwrap();
}

#[tokio::test]
async fn test_unsubscribed_listeners_stop_receiving() {
    let (server, review) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests_body()))
        .mount(&server)
        .await;

    let (seen, _) = counter();
    let mut subs: Vec<_> = (0..4)
        .map(|_| {
            let hits = Arc::clone(&seen);
            review.tests_changed().subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();
    subs[0].unsubscribe();
    subs[0].unsubscribe();
    drop(subs.pop());

    review.refresh_tests("P1").await.unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(review.tests_changed().listener_count(), 2);
}
