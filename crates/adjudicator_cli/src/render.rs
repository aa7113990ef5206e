use std::collections::BTreeMap;
use std::sync::Mutex;

use adjudicator_client::ProgressSink;
use adjudicator_core::{Intent, PreviewSlot, ProgressState, ProgressView};
use client_logging::{client_debug, client_warn};
use url::Url;

#[derive(Default)]
struct Rendered {
    line: Option<String>,
    previews: BTreeMap<PreviewSlot, String>,
}

/// Prints one line per visible change of the progress view.
pub struct TerminalSink {
    base: Url,
    rendered: Mutex<Rendered>,
}

impl TerminalSink {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            rendered: Mutex::new(Rendered::default()),
        }
    }

    fn resolve(&self, target: &str) -> String {
        match self.base.join(target) {
            Ok(url) => url.to_string(),
            Err(err) => {
                client_warn!("Could not resolve redirect target {:?}: {}", target, err);
                target.to_string()
            }
        }
    }
}

impl ProgressSink for TerminalSink {
    fn render(&self, state: &ProgressState) {
        let view = state.view();
        let mut rendered = self.rendered.lock().unwrap_or_else(|p| p.into_inner());

        let line = status_line(&view);
        if rendered.line.as_ref() != Some(&line) {
            println!("{line}");
            rendered.line = Some(line);
        }

        for (slot, content) in &view.previews {
            if rendered.previews.get(slot) != Some(content) {
                println!("{}", preview_block(*slot, content));
                rendered.previews.insert(*slot, content.clone());
            }
        }
    }

    fn perform(&self, intent: &Intent) {
        client_debug!("UI intent {:?}", intent);
    }

    fn navigate(&self, target: &str) {
        println!("Result ready: {}", self.resolve(target));
    }
}

pub fn status_line(view: &ProgressView) -> String {
    let mut line = format!("[{:>3}%] {}", view.percent, view.status_text);
    if let Some(attempt) = view.retry_banner {
        line.push_str(&format!(" (attempt {attempt})"));
    }
    if view.progress_errored {
        line.insert_str(0, "ERROR ");
    }
    line
}

fn preview_block(slot: PreviewSlot, content: &str) -> String {
    let body = content
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("  -- {} --\n{}", slot.key(), body)
}

#[cfg(test)]
mod tests {
    use adjudicator_core::{
        connection_lost, reduce, DecodedEvent, PreviewSlot, ProgressState, Stage,
    };
    use url::Url;

    use super::{preview_block, status_line, TerminalSink};

    #[test]
    fn status_line_shows_percent_and_retry_attempt() {
        let (state, _) = reduce(
            ProgressState::begin_job(),
            DecodedEvent {
                stage: Some(Stage::Retrying),
                percent: Some(45),
                message: Some("Model busy, retrying".to_string()),
                attempt: Some(1),
                ..DecodedEvent::default()
            },
        );
        assert_eq!(
            status_line(&state.view()),
            "[ 45%] Model busy, retrying (attempt 2)"
        );
    }

    #[test]
    fn status_line_flags_errors() {
        let (state, _) = connection_lost(ProgressState::begin_job());
        assert_eq!(
            status_line(&state.view()),
            "ERROR [  0%] Connection to server lost. Please try again."
        );
    }

    #[test]
    fn preview_block_indents_content() {
        assert_eq!(
            preview_block(PreviewSlot::Participants, "A: sa\n\nB: sb"),
            "  -- participants --\n    A: sa\n    \n    B: sb"
        );
    }

    #[test]
    fn redirect_targets_resolve_against_server() {
        let sink = TerminalSink::new(Url::parse("http://localhost:8000/analyze-stream/").unwrap());
        assert_eq!(sink.resolve("/result/5/"), "http://localhost:8000/result/5/");
    }
}
