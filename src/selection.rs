//! Format selection for the most recently inspected video
//!
//! Independent of the task queue: choosing a format never touches tasks,
//! and enqueuing a download never changes the selection.

use crate::types::{Format, VideoInfo};

/// The current video and the format chosen for it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormatSelection {
    video: Option<VideoInfo>,
    selected: Option<Format>,
}

impl FormatSelection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current video, resetting the selection to its first
    /// format (or none if it has no formats)
    pub fn replace(&mut self, video: VideoInfo) {
        self.selected = video.formats.first().cloned();
        self.video = Some(video);
    }

    /// Choose a format
    ///
    /// Membership in the current video's format list is the caller's
    /// responsibility; use [`select_by_id`](Self::select_by_id) to have it
    /// checked.
    pub fn select(&mut self, format: Format) {
        self.selected = Some(format);
    }

    /// Choose a format of the current video by id
    ///
    /// Returns `false`, leaving the selection unchanged, if the current video
    /// has no such format.
    pub fn select_by_id(&mut self, format_id: &str) -> bool {
        let found = self
            .video
            .as_ref()
            .and_then(|video| video.formats.iter().find(|f| f.format_id == format_id))
            .cloned();
        match found {
            Some(format) => {
                self.selected = Some(format);
                true
            }
            None => false,
        }
    }

    /// The chosen format
    pub fn selected(&self) -> Option<&Format> {
        self.selected.as_ref()
    }

    /// The current video
    pub fn video(&self) -> Option<&VideoInfo> {
        self.video.as_ref()
    }

    /// Forget the current video and selection
    pub fn clear(&mut self) {
        self.video = None;
        self.selected = None;
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: &str) -> Format {
        Format {
            format_id: id.to_string(),
            ..Default::default()
        }
    }

    fn video(formats: &[&str]) -> VideoInfo {
        VideoInfo {
            url: "https://youtu.be/abc".to_string(),
            title: "Clip".to_string(),
            formats: formats.iter().map(|id| format(id)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn replace_selects_first_format() {
        let mut selection = FormatSelection::new();
        selection.replace(video(&["22", "18"]));

        assert_eq!(selection.selected().unwrap().format_id, "22");
        assert_eq!(selection.video().unwrap().title, "Clip");
    }

    #[test]
    fn replace_without_formats_clears_selection() {
        let mut selection = FormatSelection::new();
        selection.replace(video(&["22"]));
        selection.replace(video(&[]));

        assert!(selection.selected().is_none());
        assert!(selection.video().is_some());
    }

    #[test]
    fn replace_resets_previous_choice() {
        let mut selection = FormatSelection::new();
        selection.replace(video(&["22", "18"]));
        assert!(selection.select_by_id("18"));

        selection.replace(video(&["137", "140"]));

        assert_eq!(selection.selected().unwrap().format_id, "137");
    }

    #[test]
    fn select_by_id_rejects_unknown_formats() {
        let mut selection = FormatSelection::new();
        assert!(!selection.select_by_id("22"), "no video loaded");

        selection.replace(video(&["22", "18"]));
        assert!(!selection.select_by_id("999"));
        assert_eq!(selection.selected().unwrap().format_id, "22");
    }

    #[test]
    fn select_is_unchecked() {
        let mut selection = FormatSelection::new();
        selection.replace(video(&["22"]));
        selection.select(format("custom"));

        assert_eq!(selection.selected().unwrap().format_id, "custom");
    }

    #[test]
    fn clear_forgets_everything() {
        let mut selection = FormatSelection::new();
        selection.replace(video(&["22"]));
        selection.clear();

        assert_eq!(selection, FormatSelection::default());
    }
}
