use super::*;
use crate::engine::test_helpers::ScriptedGateway;
use crate::error::{Error, RemoteError};
use crate::types::{Event, Format, RemoteTask, Status, TaskId, VideoInfo};
use std::sync::atomic::Ordering;
use std::time::Duration;

mod lifecycle;

fn test_config() -> Config {
    let mut config = Config::default();
    config.polling.auto_start = false;
    config
}

fn create_test_client() -> (DownloadClient, Arc<ScriptedGateway>) {
    create_test_client_with(test_config())
}

fn create_test_client_with(config: Config) -> (DownloadClient, Arc<ScriptedGateway>) {
    let gateway = ScriptedGateway::new();
    let client = DownloadClient::with_gateway(config, gateway.clone()).unwrap();
    (client, gateway)
}

fn format(id: &str, quality: &str) -> Format {
    Format {
        format_id: id.to_string(),
        quality: Some(quality.to_string()),
        ext: Some("mp4".to_string()),
        ..Default::default()
    }
}

fn sample_video() -> VideoInfo {
    VideoInfo {
        title: "Never Gonna Give You Up".to_string(),
        author: Some("Rick Astley".to_string()),
        duration: Some(212),
        formats: vec![format("22", "720p"), format("18", "360p")],
        ..Default::default()
    }
}
