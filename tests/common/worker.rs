//! Fake download worker built on wiremock
//!
//! The task listing is shared state, so a test can move tasks through their
//! life cycle while the client keeps polling the same mock.

use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use video_dl::{Config, DownloadClient};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Response of `GET /api/tasks`, replaceable while the client polls
#[derive(Clone)]
struct Listing(Arc<Mutex<ResponseTemplate>>);

impl Respond for Listing {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.0.lock().unwrap().clone()
    }
}

/// Wrap a payload in the worker's response envelope
pub fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "message": "ok",
        "data": data,
        "statusCode": 200,
    })
}

/// A mock worker serving the task endpoints
pub struct FakeWorker {
    pub server: MockServer,
    listing: Listing,
}

impl FakeWorker {
    /// Start a worker with an empty task list
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let listing = Listing(Arc::new(Mutex::new(
            ResponseTemplate::new(200).set_body_json(envelope(json!([]))),
        )));

        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(listing.clone())
            .mount(&server)
            .await;

        Self { server, listing }
    }

    /// Client configuration pointing at this worker, polling every 50 ms
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.api.base_url = self.server.uri();
        config.api.request_timeout = Duration::from_secs(2);
        config.polling.interval = Duration::from_millis(50);
        config.polling.auto_start = false;
        config
    }

    /// Client connected to this worker
    pub fn client(&self) -> DownloadClient {
        DownloadClient::new(self.config()).unwrap()
    }

    /// Report these task entries from now on
    pub fn report_tasks(&self, tasks: Value) {
        self.respond_to_listing(ResponseTemplate::new(200).set_body_json(envelope(tasks)));
    }

    /// Answer the task listing with an arbitrary response from now on
    pub fn respond_to_listing(&self, response: ResponseTemplate) {
        *self.listing.0.lock().unwrap() = response;
    }

    /// Accept the next download request under `task_id`
    pub async fn accept_download(&self, task_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/download"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(envelope(json!({ "taskId": task_id }))),
            )
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Answer every cancel request with `status`
    pub async fn answer_cancel(&self, status: u16) {
        let body = if status < 300 {
            envelope(Value::Null)
        } else {
            json!({ "success": false, "message": "Task not found", "statusCode": status })
        };
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/api/tasks/.+$"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serve video metadata and the supported-service list
    pub async fn serve_metadata(&self, services: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/api/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "title": "Never Gonna Give You Up",
                "author": "Rick Astley",
                "duration": 212,
                "formats": [
                    { "format_id": "22", "quality": "720p", "ext": "mp4" },
                    { "format_id": "18", "quality": "360p", "ext": "mp4" },
                ],
            }))))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(services))))
            .mount(&self.server)
            .await;
    }
}
