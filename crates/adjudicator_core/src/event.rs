use std::collections::BTreeMap;

use crate::Stage;

/// One decoded stream message. Any subset of fields may be present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedEvent {
    /// Keep-alive only; carries no progress.
    pub heartbeat: bool,
    pub status: Option<Stage>,
    pub stage: Option<Stage>,
    pub percent: Option<u8>,
    pub message: Option<String>,
    /// Raw snippet mapping keyed by preview slot name.
    pub previews: Option<BTreeMap<String, String>>,
    pub title: Option<String>,
    pub entity_a: Option<String>,
    pub entity_b: Option<String>,
    pub summary_a: Option<String>,
    pub summary_b: Option<String>,
    pub attempt: Option<u32>,
    pub redirect: Option<String>,
    pub job_id: Option<String>,
}

impl DecodedEvent {
    pub fn heartbeat() -> Self {
        Self {
            heartbeat: true,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == Some(Stage::Complete) || self.stage == Some(Stage::Complete)
    }

    pub fn is_error(&self) -> bool {
        self.status == Some(Stage::Error) || self.stage == Some(Stage::Error)
    }

    pub(crate) fn has_paired_fields(&self) -> bool {
        self.entity_a.is_some()
            || self.entity_b.is_some()
            || self.summary_a.is_some()
            || self.summary_b.is_some()
    }
}
