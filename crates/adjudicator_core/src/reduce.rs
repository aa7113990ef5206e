use crate::{
    DecodedEvent, Intent, Outcome, PreviewSlot, ProgressState, Stage, REDIRECT_DELAY,
};

pub const COMPLETE_MESSAGE: &str = "Analysis complete!";
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred during analysis";
pub const CONNECTION_LOST_MESSAGE: &str = "Connection to server lost. Please try again.";

/// Pure reducer: applies one decoded stream event and returns any intents.
pub fn reduce(mut state: ProgressState, event: DecodedEvent) -> (ProgressState, Vec<Intent>) {
    if event.heartbeat {
        return (state, Vec::new());
    }

    // Terminal events short-circuit every incremental field they carry.
    let intents = if event.is_complete() {
        apply_complete(&mut state, event)
    } else if event.is_error() {
        apply_error(&mut state, event)
    } else {
        apply_incremental(&mut state, event)
    };

    (state, intents)
}

/// Transport failure of the stream. Ignored once the job is no longer active.
pub fn connection_lost(mut state: ProgressState) -> (ProgressState, Vec<Intent>) {
    if !state.is_active {
        return (state, vec![Intent::CloseStream]);
    }
    fail(&mut state, CONNECTION_LOST_MESSAGE.to_string());
    (state, vec![Intent::CloseStream, Intent::ReEnableSubmission])
}

/// The initiating request was refused or never reached the server.
pub fn submission_failed(mut state: ProgressState, reason: &str) -> (ProgressState, Vec<Intent>) {
    fail(&mut state, reason.to_string());
    (state, vec![Intent::ReEnableSubmission])
}

fn apply_complete(state: &mut ProgressState, event: DecodedEvent) -> Vec<Intent> {
    state.is_active = false;
    state.percent = 100;
    state.stage = Stage::Complete;
    state.message = Some(COMPLETE_MESSAGE.to_string());
    state.outcome = Outcome::Success {
        redirect_target: event.redirect.clone(),
        job_id: event.job_id,
    };

    let mut intents = vec![Intent::CloseStream];
    if let Some(target) = event.redirect {
        intents.push(Intent::ScheduleRedirect {
            target,
            delay: REDIRECT_DELAY,
        });
    }
    intents
}

fn apply_error(state: &mut ProgressState, event: DecodedEvent) -> Vec<Intent> {
    let reason = event
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
    fail(state, reason);
    state.stage = Stage::Error;

    vec![
        Intent::CloseStream,
        Intent::ReEnableSubmission,
        Intent::MarkProgressErrored,
    ]
}

fn apply_incremental(state: &mut ProgressState, event: DecodedEvent) -> Vec<Intent> {
    let mut intents = Vec::new();

    if let Some(percent) = event.percent {
        state.percent = percent;
    }
    if let Some(message) = event.message.as_ref().filter(|message| !message.is_empty()) {
        state.message = Some(message.clone());
    }
    if let Some(stage) = &event.stage {
        state.stage = stage.clone();
    }

    if let Some(snippets) = &event.previews {
        for (key, content) in snippets {
            let Some(slot) = PreviewSlot::from_key(key) else {
                continue;
            };
            state.previews.insert(slot, content.clone());
            intents.push(Intent::ShowPreview(slot));
        }
    }

    match &event.stage {
        Some(Stage::TitleExtracted | Stage::InitialAnalysis) => {
            apply_participants(state, &event, &mut intents);
        }
        Some(Stage::Retrying) => {
            state.retry_count = match event.attempt {
                Some(attempt) if attempt > 0 => attempt,
                _ => state.retry_count.saturating_add(1),
            };
        }
        _ => {}
    }

    intents
}

fn apply_participants(state: &mut ProgressState, event: &DecodedEvent, intents: &mut Vec<Intent>) {
    let results = &mut state.results;
    for (slot, value) in [
        (&mut results.title, &event.title),
        (&mut results.entity_a, &event.entity_a),
        (&mut results.entity_b, &event.entity_b),
        (&mut results.summary_a, &event.summary_a),
        (&mut results.summary_b, &event.summary_b),
    ] {
        if let Some(value) = value {
            *slot = Some(value.clone());
        }
    }

    if event.has_paired_fields() {
        let preview = state.results.participants_preview();
        state.previews.insert(PreviewSlot::Participants, preview);
        if !intents.contains(&Intent::ShowPreview(PreviewSlot::Participants)) {
            intents.push(Intent::ShowPreview(PreviewSlot::Participants));
        }
    }
}

fn fail(state: &mut ProgressState, reason: String) {
    state.is_active = false;
    state.error = Some(reason.clone());
    state.outcome = Outcome::Failure { reason };
}
