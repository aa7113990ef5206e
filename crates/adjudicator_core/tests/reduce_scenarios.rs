use adjudicator_core::{
    persist_intents, reduce, DecodedEvent, Intent, Outcome, PreviewSlot, ProgressState, Stage,
    StorageKey, REDIRECT_DELAY,
};
use pretty_assertions::assert_eq;

fn run(events: Vec<DecodedEvent>) -> (ProgressState, Vec<Intent>) {
    let mut state = ProgressState::begin_job();
    let mut all = Vec::new();
    for event in events {
        let (next, intents) = reduce(state, event);
        state = next;
        all.extend(intents);
    }
    (state, all)
}

#[test]
fn full_job_with_retry_completes_and_redirects() {
    client_logging::initialize_for_tests();
    let (state, intents) = run(vec![
        DecodedEvent {
            stage: Some(Stage::Starting),
            ..DecodedEvent::default()
        },
        DecodedEvent {
            percent: Some(30),
            message: Some("Extracting...".to_string()),
            ..DecodedEvent::default()
        },
        DecodedEvent::heartbeat(),
        DecodedEvent {
            stage: Some(Stage::Retrying),
            attempt: Some(2),
            ..DecodedEvent::default()
        },
        DecodedEvent {
            status: Some(Stage::Complete),
            redirect: Some("/debate/5".to_string()),
            job_id: Some("5".to_string()),
            ..DecodedEvent::default()
        },
    ]);

    assert!(!state.is_active());
    assert_eq!(state.percent(), 100);
    assert_eq!(state.retry_count(), 2);
    assert_eq!(
        state.outcome(),
        &Outcome::Success {
            redirect_target: Some("/debate/5".to_string()),
            job_id: Some("5".to_string()),
        }
    );
    assert!(intents.contains(&Intent::ScheduleRedirect {
        target: "/debate/5".to_string(),
        delay: REDIRECT_DELAY,
    }));
    assert_eq!(REDIRECT_DELAY.as_millis(), 1000);

    assert_eq!(
        persist_intents(state.outcome()),
        vec![
            Intent::Persist {
                key: StorageKey::LastRedirectUrl,
                value: "/debate/5".to_string(),
            },
            Intent::Persist {
                key: StorageKey::LastDebateId,
                value: "5".to_string(),
            },
        ]
    );
}

#[test]
fn initial_analysis_builds_participants_preview() {
    client_logging::initialize_for_tests();
    let (state, intents) = run(vec![DecodedEvent {
        stage: Some(Stage::InitialAnalysis),
        entity_a: Some("A".to_string()),
        entity_b: Some("B".to_string()),
        summary_a: Some("sa".to_string()),
        summary_b: Some("sb".to_string()),
        ..DecodedEvent::default()
    }]);

    assert_eq!(state.preview(PreviewSlot::Participants), Some("A: sa\n\nB: sb"));
    assert!(intents.contains(&Intent::ShowPreview(PreviewSlot::Participants)));
    assert!(state
        .view()
        .is_preview_visible(PreviewSlot::Participants));
}

#[test]
fn new_job_starts_from_a_clean_state() {
    client_logging::initialize_for_tests();
    let (finished, _) = run(vec![
        DecodedEvent {
            stage: Some(Stage::Retrying),
            previews: Some([("judgment".to_string(), "P1".to_string())].into()),
            ..DecodedEvent::default()
        },
        DecodedEvent {
            status: Some(Stage::Error),
            ..DecodedEvent::default()
        },
    ]);
    assert_eq!(finished.retry_count(), 1);

    let fresh = ProgressState::begin_job();
    assert!(fresh.is_active());
    assert_eq!(fresh.stage(), &Stage::Starting);
    assert_eq!(fresh.retry_count(), 0);
    assert!(fresh.previews().is_empty());
    assert_eq!(fresh.outcome(), &Outcome::None);
    assert_eq!(fresh.error(), None);
}

#[test]
fn failure_outcome_persists_nothing() {
    let (state, _) = run(vec![DecodedEvent {
        stage: Some(Stage::Error),
        ..DecodedEvent::default()
    }]);
    assert!(persist_intents(state.outcome()).is_empty());
    assert!(persist_intents(&Outcome::None).is_empty());
}
