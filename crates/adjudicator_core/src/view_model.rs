use crate::{PreviewSlot, ResultSlots};

/// Read-only snapshot for whatever renders progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub overlay_visible: bool,
    /// Latest message, or the catalog text for the current stage.
    pub display_text: String,
    /// Error text when present, otherwise `display_text`.
    pub status_text: String,
    pub loading_text: String,
    pub percent: u8,
    pub progress_errored: bool,
    /// Attempt number shown in the retry banner, if it is visible.
    pub retry_banner: Option<u32>,
    pub visible_previews: Vec<PreviewSlot>,
    pub previews: Vec<(PreviewSlot, String)>,
    pub results: ResultSlots,
    pub results_visible: bool,
    pub submission_disabled: bool,
    /// Leaving the page should ask for confirmation.
    pub confirm_leave: bool,
    pub error: Option<String>,
}

impl ProgressView {
    pub fn is_preview_visible(&self, slot: PreviewSlot) -> bool {
        self.visible_previews.contains(&slot)
    }

    pub fn preview(&self, slot: PreviewSlot) -> Option<&str> {
        self.previews
            .iter()
            .find(|(candidate, _)| *candidate == slot)
            .map(|(_, content)| content.as_str())
    }
}
