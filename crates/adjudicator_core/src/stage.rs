/// Coarse phase identifier reported by the analysis server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Starting,
    Extracting,
    TitleExtracted,
    Analyzing,
    Analysis,
    InitialAnalysis,
    Participants,
    Evaluating,
    Evaluation,
    EvaluationProgress,
    Judging,
    Judgment,
    JudgmentProgress,
    Formatting,
    Saving,
    ProcessingComplete,
    Retrying,
    Complete,
    Error,
    /// Identifier this client does not know; kept verbatim.
    Other(String),
}

const KNOWN_STAGES: &[(&str, Stage)] = &[
    ("idle", Stage::Idle),
    ("starting", Stage::Starting),
    ("extracting", Stage::Extracting),
    ("title_extracted", Stage::TitleExtracted),
    ("analyzing", Stage::Analyzing),
    ("analysis", Stage::Analysis),
    ("initial_analysis", Stage::InitialAnalysis),
    ("participants", Stage::Participants),
    ("evaluating", Stage::Evaluating),
    ("evaluation", Stage::Evaluation),
    ("evaluation_progress", Stage::EvaluationProgress),
    ("judging", Stage::Judging),
    ("judgment", Stage::Judgment),
    ("judgment_progress", Stage::JudgmentProgress),
    ("formatting", Stage::Formatting),
    ("saving", Stage::Saving),
    ("processing_complete", Stage::ProcessingComplete),
    ("retrying", Stage::Retrying),
    ("complete", Stage::Complete),
    ("error", Stage::Error),
];

impl Stage {
    /// Map a wire identifier to a stage. Unknown identifiers become `Other`.
    pub fn parse(raw: &str) -> Self {
        KNOWN_STAGES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, stage)| stage.clone())
            .unwrap_or_else(|| Stage::Other(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        if let Stage::Other(raw) = self {
            return raw;
        }
        KNOWN_STAGES
            .iter()
            .find(|(_, stage)| stage == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }
}

/// Human-readable status line for a stage.
pub fn stage_text(stage: &Stage) -> &'static str {
    match stage {
        Stage::Starting => "Starting analysis...",
        Stage::Extracting | Stage::TitleExtracted => "Extracting debate information...",
        Stage::Analyzing | Stage::Analysis | Stage::InitialAnalysis => "Analyzing arguments...",
        Stage::Evaluating | Stage::Evaluation => "Evaluating debate quality...",
        Stage::Judging | Stage::Judgment => "Determining winner...",
        Stage::Formatting => "Formatting results...",
        Stage::Saving => "Saving results...",
        Stage::Complete => "Analysis complete!",
        _ => "Processing...",
    }
}

/// Named UI region showing an incrementally revealed snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreviewSlot {
    Participants,
    Evaluation,
    Judgment,
}

impl PreviewSlot {
    pub const ALL: [PreviewSlot; 3] = [
        PreviewSlot::Participants,
        PreviewSlot::Evaluation,
        PreviewSlot::Judgment,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            PreviewSlot::Participants => "participants",
            PreviewSlot::Evaluation => "evaluation",
            PreviewSlot::Judgment => "judgment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{stage_text, PreviewSlot, Stage};

    #[test]
    fn parse_and_as_str_agree_for_known_stages() {
        for raw in ["title_extracted", "initial_analysis", "retrying", "complete"] {
            assert_eq!(Stage::parse(raw).as_str(), raw);
        }
        assert_eq!(Stage::parse("initial_analysis"), Stage::InitialAnalysis);
    }

    #[test]
    fn unknown_stage_is_kept_verbatim() {
        let stage = Stage::parse("processing");
        assert_eq!(stage, Stage::Other("processing".to_string()));
        assert_eq!(stage.as_str(), "processing");
        assert_eq!(stage_text(&stage), "Processing...");
    }

    #[test]
    fn catalog_groups_aliases() {
        assert_eq!(stage_text(&Stage::TitleExtracted), stage_text(&Stage::Extracting));
        assert_eq!(stage_text(&Stage::Analysis), "Analyzing arguments...");
        assert_eq!(stage_text(&Stage::Judgment), "Determining winner...");
        assert_eq!(stage_text(&Stage::Retrying), "Processing...");
        assert_eq!(stage_text(&Stage::Idle), "Processing...");
    }

    #[test]
    fn preview_keys_are_fixed() {
        assert_eq!(PreviewSlot::from_key("evaluation"), Some(PreviewSlot::Evaluation));
        assert_eq!(PreviewSlot::from_key("winner"), None);
        assert_eq!(PreviewSlot::Participants.key(), "participants");
    }
}
