#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use enrich_api::background::enrichment_jobs::{EnrichmentJobs, JobReport};
use enrich_api::routes;
use enrich_api::state::AppState;
use enrich_core::field::EnrichmentField;
use enrich_core::lead::LeadId;
use enrich_pipeline::{LeadStore, LookupError, PhoneEnricher, PhoneLookup, StoreError};

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

/// Returns the same phone for every profile, except those marked failing.
pub struct FakeLookup {
    phone: Option<Value>,
    failing: HashSet<String>,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeLookup {
    pub fn returning(phone: Value) -> Self {
        Self {
            phone: Some(phone),
            failing: HashSet::new(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(mut self, profile_url: &str) -> Self {
        self.failing.insert(profile_url.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PhoneLookup for FakeLookup {
    async fn find_phone(&self, profile_url: &str) -> Result<Option<Value>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.contains(profile_url) {
            return Err(LookupError::Other("provider unavailable".into()));
        }
        Ok(self.phone.clone())
    }
}

/// Lookup that panics, for exercising job supervision.
pub struct PanickingLookup;

#[async_trait]
impl PhoneLookup for PanickingLookup {
    async fn find_phone(&self, _profile_url: &str) -> Result<Option<Value>, LookupError> {
        panic!("lookup exploded");
    }
}

/// Records every write.
#[derive(Default)]
pub struct RecordingStore {
    writes: Mutex<Vec<(LeadId, EnrichmentField, String)>>,
}

impl RecordingStore {
    pub fn writes(&self) -> Vec<(LeadId, EnrichmentField, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadStore for RecordingStore {
    async fn update_phone(
        &self,
        id: &LeadId,
        field: EnrichmentField,
        value: &str,
    ) -> Result<(), StoreError> {
        self.writes
            .lock()
            .unwrap()
            .push((id.clone(), field, value.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Everything a test needs to drive the app and inspect side effects.
pub struct TestApp {
    pub router: Router,
    pub jobs: EnrichmentJobs,
    pub reports: mpsc::UnboundedReceiver<JobReport>,
}

/// Build the full application router with all middleware layers around
/// the given collaborators.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(lookup: Arc<dyn PhoneLookup>, store: Arc<dyn LeadStore>) -> TestApp {
    build_test_app_with_timeout(lookup, store, Duration::from_secs(30))
}

/// Same as [`build_test_app`] with a custom request timeout.
pub fn build_test_app_with_timeout(
    lookup: Arc<dyn PhoneLookup>,
    store: Arc<dyn LeadStore>,
    request_timeout: Duration,
) -> TestApp {
    let enricher = Arc::new(PhoneEnricher::new(lookup, store));
    let (jobs, reports) = EnrichmentJobs::new(enricher);

    let state = AppState { jobs: jobs.clone() };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        router,
        jobs,
        reports,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
