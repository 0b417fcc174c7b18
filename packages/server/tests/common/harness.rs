//! Test harness driving the router in-process.
//!
//! No sockets: requests go straight through `tower::ServiceExt::oneshot`.
//! The pipeline uses mock fetcher/generator and a temp artifact directory.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lexigraph_server::server::{build_router, AppState};
use vocab_extraction::{
    testing::{MockFetcher, MockGenerator},
    FileArtifactStore, LevelTable, MemoryJobStore, MemoryWordStore, Pipeline,
};

pub struct TestHarness {
    pub router: Router,
    pub generator: MockGenerator,
    // Keep the artifact directory alive for the whole test
    _artifacts: TempDir,
}

/// Response status, content type and body.
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_generator(MockGenerator::new().with_response(
            r#"[{"chinese":"圖書館","english":"library","definition":"a place with books","example_chinese":"我去圖書館。","example_english":"I go to the library."}]"#,
        ))
    }

    pub fn with_generator(generator: MockGenerator) -> Self {
        Self::build(generator, Some("server-key"))
    }

    /// No server-side key: requests must carry `api_key`.
    pub fn without_default_key() -> Self {
        Self::build(MockGenerator::new().with_response("[]"), None)
    }

    fn build(generator: MockGenerator, default_key: Option<&str>) -> Self {
        // Uses try_init() to avoid panicking if already initialized.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let artifacts = tempfile::tempdir().expect("Failed to create artifact dir");

        let mut pipeline = Pipeline::new(
            MockFetcher::new().with_page("https://news.example/story", "學生每天去圖書館看書。"),
            generator.clone(),
            MemoryJobStore::new(),
            FileArtifactStore::new(artifacts.path()),
        )
        .with_levels(LevelTable::parse("word,deng,ji\n圖書館,基礎,第2級\n"));
        if let Some(key) = default_key {
            pipeline = pipeline.with_default_credential(key);
        }

        let state = AppState::new(pipeline, MemoryWordStore::new());
        Self {
            router: build_router(state, &[]),
            generator,
            _artifacts: artifacts,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_as(&self, uri: &str, header: (&str, &str)) -> TestResponse {
        let request = Request::get(uri)
            .header(header.0, header.1)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.post_json_as(uri, body, ("x-user-id", "test-user")).await
    }

    pub async fn post_json_as(&self, uri: &str, body: Value, header: (&str, &str)) -> TestResponse {
        let request = Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(header.0, header.1)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// POST a body verbatim, for payloads that are not valid JSON.
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn delete_as(&self, uri: &str, header: (&str, &str)) -> TestResponse {
        let request = Request::delete(uri)
            .header(header.0, header.1)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Poll a job until it reaches a terminal status.
    pub async fn wait_for_job(&self, job_id: &str) -> Value {
        for _ in 0..400 {
            let report = self.get(&format!("/api/jobs/{job_id}")).await.json();
            if matches!(report["status"].as_str(), Some("completed" | "failed")) {
                return report;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("job {job_id} did not finish");
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
