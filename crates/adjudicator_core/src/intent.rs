use std::time::Duration;

use crate::{Outcome, PreviewSlot};

/// Delay between completion and navigating to the result.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CloseStream,
    ScheduleRedirect { target: String, delay: Duration },
    ReEnableSubmission,
    ShowPreview(PreviewSlot),
    MarkProgressErrored,
    Persist { key: StorageKey, value: String },
}

/// Durable client-side storage keys read by later pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    LastRedirectUrl,
    LastDebateId,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::LastRedirectUrl => "last_redirect_url",
            StorageKey::LastDebateId => "last_debate_id",
        }
    }
}

/// Persistence intents for a successful outcome; empty for anything else.
pub fn persist_intents(outcome: &Outcome) -> Vec<Intent> {
    let Outcome::Success {
        redirect_target,
        job_id,
    } = outcome
    else {
        return Vec::new();
    };

    let mut intents = Vec::with_capacity(2);
    if let Some(target) = redirect_target {
        intents.push(Intent::Persist {
            key: StorageKey::LastRedirectUrl,
            value: target.clone(),
        });
    }
    if let Some(job_id) = job_id {
        intents.push(Intent::Persist {
            key: StorageKey::LastDebateId,
            value: job_id.clone(),
        });
    }
    intents
}
