//! Video inspection, format choice and service validation.

use crate::error::{Error, Result};
use crate::services::{ServiceKind, SupportedServices};
use crate::task::Task;
use crate::types::{DownloadRequest, Event, Format, VideoInfo};

use super::DownloadClient;

impl DownloadClient {
    /// Load the worker's supported-service list
    ///
    /// On failure the previous catalog is kept (not loaded, on first use).
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn load_services(&self) -> Result<Vec<String>> {
        let ids = match self.gateway.list_services().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load supported services");
                return Err(e.into());
            }
        };

        *self.services.write().await = SupportedServices::Loaded(ids.clone());
        tracing::info!(count = ids.len(), "Supported services loaded");
        self.emit_event(Event::ServicesLoaded { count: ids.len() });

        Ok(ids)
    }

    /// Current supported-service catalog
    pub async fn supported_services(&self) -> SupportedServices {
        self.services.read().await.clone()
    }

    /// Check a URL against the supported-service catalog
    ///
    /// Returns the detected service, if any. Only rejects when URL
    /// validation is enabled and the catalog is loaded; until then every
    /// non-empty URL passes and the worker has the final word.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty URL, a URL of no known
    /// service, or a service the worker does not accept.
    pub async fn validate_url(&self, url: &str) -> Result<Option<ServiceKind>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidInput("URL must not be empty".to_string()));
        }

        let kind = ServiceKind::detect(url);
        if !self.config.validate_urls {
            return Ok(kind);
        }

        let services = self.services.read().await;
        if !services.is_loaded() {
            return Ok(kind);
        }

        match kind {
            None => Err(Error::InvalidInput(format!("unsupported video URL: {}", url))),
            Some(kind) if services.allows(kind) == Some(false) => Err(Error::InvalidInput(
                format!("{} is not supported by the worker", kind),
            )),
            Some(kind) => Ok(Some(kind)),
        }
    }

    /// Fetch metadata for a video and make it the current video
    ///
    /// The format selection is reset to the first available format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the URL fails local validation, or
    /// the gateway error. The current video is unchanged on error.
    pub async fn fetch_video_info(&self, url: &str) -> Result<VideoInfo> {
        self.validate_url(url).await?;
        let url = url.trim();

        let info = self.gateway.fetch_metadata(url).await?;
        tracing::info!(
            url = %url,
            title = %info.title,
            formats = info.formats.len(),
            "Video info loaded"
        );

        self.selection.write().await.replace(info.clone());
        self.emit_event(Event::VideoInfoLoaded {
            url: info.url.clone(),
            formats: info.formats.len(),
        });

        Ok(info)
    }

    /// The current video, if one was loaded
    pub async fn video_info(&self) -> Option<VideoInfo> {
        self.selection.read().await.video().cloned()
    }

    /// The chosen format of the current video
    pub async fn selected_format(&self) -> Option<Format> {
        self.selection.read().await.selected().cloned()
    }

    /// Forget the current video and its chosen format
    pub async fn clear_video_info(&self) {
        self.selection.write().await.clear();
    }

    /// Choose a format without checking it belongs to the current video
    pub async fn select_format(&self, format: Format) {
        self.selection.write().await.select(format);
    }

    /// Choose one of the current video's formats by id
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no video is loaded or it has no
    /// such format; the selection is unchanged.
    pub async fn select_format_by_id(&self, format_id: &str) -> Result<()> {
        if self.selection.write().await.select_by_id(format_id) {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "format '{}' is not available for the current video",
                format_id
            )))
        }
    }

    /// Enqueue the chosen format of the current video
    ///
    /// The video title is shown for the task until the worker reports one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no video is loaded or no format is
    /// chosen, or the gateway error.
    pub async fn download_selected(&self) -> Result<Task> {
        let request = {
            let selection = self.selection.read().await;
            let (Some(video), Some(format)) = (selection.video(), selection.selected()) else {
                return Err(Error::InvalidInput("no format selected".to_string()));
            };

            let request =
                DownloadRequest::new(&video.url, &format.format_id, format.quality_label());
            if video.title.is_empty() {
                request
            } else {
                request.with_title(&video.title)
            }
        };

        self.engine.create_and_track(request).await
    }
}
