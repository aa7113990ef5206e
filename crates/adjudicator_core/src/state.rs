use std::collections::BTreeMap;

use crate::view_model::ProgressView;
use crate::{stage_text, PreviewSlot, Stage};

/// Terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    None,
    Success {
        redirect_target: Option<String>,
        job_id: Option<String>,
    },
    Failure {
        reason: String,
    },
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::None)
    }
}

/// Dedicated result slots filled from stage-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSlots {
    pub title: Option<String>,
    pub entity_a: Option<String>,
    pub entity_b: Option<String>,
    pub summary_a: Option<String>,
    pub summary_b: Option<String>,
}

impl ResultSlots {
    /// Combined participants preview. Missing parts render as empty text.
    pub fn participants_preview(&self) -> String {
        let part = |value: &Option<String>| value.clone().unwrap_or_default();
        format!(
            "{}: {}\n\n{}: {}",
            part(&self.entity_a),
            part(&self.summary_a),
            part(&self.entity_b),
            part(&self.summary_b)
        )
    }
}

/// Progress of the single live analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub(crate) is_active: bool,
    pub(crate) percent: u8,
    pub(crate) stage: Stage,
    pub(crate) message: Option<String>,
    pub(crate) retry_count: u32,
    pub(crate) previews: BTreeMap<PreviewSlot, String>,
    pub(crate) results: ResultSlots,
    pub(crate) outcome: Outcome,
    pub(crate) error: Option<String>,
}

impl ProgressState {
    /// Idle state, before any submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully reset state for a freshly submitted job.
    pub fn begin_job() -> Self {
        Self {
            is_active: true,
            stage: Stage::Starting,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn preview(&self, slot: PreviewSlot) -> Option<&str> {
        self.previews.get(&slot).map(String::as_str)
    }

    pub fn previews(&self) -> &BTreeMap<PreviewSlot, String> {
        &self.previews
    }

    pub fn results(&self) -> &ResultSlots {
        &self.results
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Projects the state into an immutable view snapshot.
    pub fn view(&self) -> ProgressView {
        let display_text = self
            .message
            .clone()
            .unwrap_or_else(|| stage_text(&self.stage).to_string());
        let (status_text, loading_text) = match &self.error {
            Some(error) => (error.clone(), "Error".to_string()),
            None => (display_text.clone(), display_text.clone()),
        };

        ProgressView {
            overlay_visible: self.is_active,
            display_text,
            status_text,
            loading_text,
            percent: self.percent,
            progress_errored: matches!(self.outcome, Outcome::Failure { .. }),
            retry_banner: (self.retry_count > 0).then(|| self.retry_count.saturating_add(1)),
            visible_previews: self.previews.keys().copied().collect(),
            previews: self
                .previews
                .iter()
                .map(|(slot, content)| (*slot, content.clone()))
                .collect(),
            results: self.results.clone(),
            results_visible: self.is_active,
            submission_disabled: self.is_active,
            confirm_leave: self.is_active,
            error: self.error.clone(),
        }
    }
}
