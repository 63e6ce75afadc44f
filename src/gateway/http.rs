//! reqwest-based gateway for the worker REST API

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::{ApiConfig, Endpoints};
use crate::error::{Error, ErrorCode, RemoteError, Result};
use crate::types::{CreatedTask, RemoteTask, TaskId, VideoInfo};

use super::traits::{RemoteGateway, RemoteResult};
use super::wire;

/// Gateway operation, used for error classification and messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    FetchMetadata,
    CreateTask,
    ListTasks,
    CancelTask,
    ListServices,
}

impl Operation {
    fn default_message(self) -> &'static str {
        match self {
            Operation::FetchMetadata => "Failed to fetch video info",
            Operation::CreateTask => "Failed to start download",
            Operation::ListTasks => "Failed to fetch tasks",
            Operation::CancelTask => "Failed to cancel task",
            Operation::ListServices => "Failed to fetch supported services",
        }
    }

    /// Whether the request reaches a video service through the worker
    fn targets_service(self) -> bool {
        matches!(self, Operation::FetchMetadata | Operation::CreateTask)
    }

    /// Map a non-success status to an error code
    ///
    /// For metadata and creation every 5xx is a rejection: the worker
    /// answers 503 when the video's service is disabled by its operator,
    /// which retrying does not fix. Elsewhere gateway-type 5xx answers are
    /// transient. A 4xx is the user's input for every operation except
    /// cancel, where it is the server's definitive answer about the task
    /// (e.g. it no longer exists).
    fn classify(self, status: StatusCode) -> ErrorCode {
        match status {
            s if s.is_server_error() && self.targets_service() => ErrorCode::RemoteRejected,
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => ErrorCode::Unavailable,
            s if s.is_client_error() && self == Operation::CancelTask => ErrorCode::RemoteRejected,
            s if s.is_client_error() => ErrorCode::InvalidInput,
            _ => ErrorCode::RemoteRejected,
        }
    }
}

/// HTTP implementation of [`RemoteGateway`]
///
/// Uses one pooled reqwest client with the configured timeout and
/// `Accept-Language` header for every request.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpGateway {
    /// Build a gateway from API settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid, the language
    /// is not a valid header value, or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        url::Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", config.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let language = HeaderValue::from_str(&config.accept_language).map_err(|e| Error::Config {
            message: format!("invalid language '{}': {}", config.accept_language, e),
            key: Some("api.accept_language".to_string()),
        })?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn transport failures and non-success statuses
    /// into classified errors
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> RemoteResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(?operation, error = %e, "Worker API request failed");
            RemoteError::from(e)
        })?;

        let status = response.status();
        tracing::debug!(?operation, status = status.as_u16(), "Worker API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = wire::error_message(&body)
            .unwrap_or_else(|| operation.default_message().to_string());
        tracing::warn!(
            ?operation,
            status = status.as_u16(),
            message = %message,
            "Worker API returned an error"
        );

        Err(RemoteError::new(operation.classify(status), message).with_status(status.as_u16()))
    }

    async fn read_json(response: reqwest::Response) -> RemoteResult<Option<Value>> {
        let body = response.bytes().await.map_err(RemoteError::from)?;
        Ok(serde_json::from_slice(&body).ok())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_metadata(&self, url: &str) -> RemoteResult<VideoInfo> {
        tracing::debug!(url = %url, "Fetching video info");
        let request = self
            .client
            .get(self.endpoint(&self.endpoints.info))
            .query(&[("url", url)]);
        let response = self.send(request, Operation::FetchMetadata).await?;

        let body = Self::read_json(response)
            .await?
            .ok_or_else(|| RemoteError::rejected("malformed video info response"))?;
        let mut info: VideoInfo = serde_json::from_value(wire::unwrap_envelope(body))
            .map_err(|e| RemoteError::rejected(format!("malformed video info response: {}", e)))?;
        info.url = url.to_string();

        Ok(info)
    }

    async fn create_task(
        &self,
        url: &str,
        format_id: &str,
        quality: &str,
    ) -> RemoteResult<CreatedTask> {
        let payload = serde_json::json!({
            "url": url,
            "formatId": format_id,
            "quality": quality,
        });
        let request = self
            .client
            .post(self.endpoint(&self.endpoints.download))
            .json(&payload);
        let response = self.send(request, Operation::CreateTask).await?;

        let id = Self::read_json(response)
            .await?
            .and_then(wire::created_task_id)
            .ok_or_else(|| RemoteError::rejected("worker response did not include a task id"))?;

        Ok(CreatedTask { id })
    }

    async fn list_tasks(&self) -> RemoteResult<Vec<RemoteTask>> {
        let request = self.client.get(self.endpoint(&self.endpoints.tasks));
        let response = match self.send(request, Operation::ListTasks).await {
            Ok(response) => response,
            // The worker answers 403/404 when it tracks nothing for this client
            Err(e) if matches!(e.status, Some(403) | Some(404)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let Some(body) = Self::read_json(response).await? else {
            tracing::warn!("Task listing is not valid JSON, treating as empty");
            return Ok(Vec::new());
        };

        let (tasks, well_formed) = wire::task_list(body);
        if !well_formed {
            tracing::warn!("Task listing is not an array, treating as empty");
        }
        Ok(tasks)
    }

    async fn cancel_task(&self, id: &TaskId) -> RemoteResult<()> {
        let path = format!(
            "{}/{}",
            self.endpoints.cancel.trim_end_matches('/'),
            urlencoding::encode(id.as_str())
        );
        let request = self.client.delete(self.endpoint(&path));
        self.send(request, Operation::CancelTask).await?;
        Ok(())
    }

    async fn list_services(&self) -> RemoteResult<Vec<String>> {
        let request = self.client.get(self.endpoint(&self.endpoints.services));
        let response = self.send(request, Operation::ListServices).await?;

        let body = Self::read_json(response)
            .await?
            .ok_or_else(|| RemoteError::rejected("malformed service list response"))?;
        Ok(wire::service_list(body))
    }

    fn name(&self) -> &str {
        "http"
    }
}
