use std::time::Duration;

/// Form field carrying the debate transcript.
pub const DEBATE_TEXT_FIELD: &str = "debate_text";

/// Shown when a refused submission carries no usable error payload.
pub const FALLBACK_REJECTION_MESSAGE: &str = "Network response was not ok";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    /// Path used both for the initiating POST and the event stream GET.
    pub stream_path: String,
    pub connect_timeout: Duration,
    /// Applies to the initiating request only.
    pub request_timeout: Duration,
    /// Longest silence tolerated on the stream; the server heartbeats well within it.
    pub stream_idle_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            stream_path: "/analyze-stream/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            stream_idle_timeout: Duration::from_secs(60),
        }
    }
}

/// File-like form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Key/value and file fields sent with the initiating request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobParameters {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl JobParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debate_text(text: impl Into<String>) -> Self {
        Self::new().text(DEBATE_TEXT_FIELD, text)
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// Prerequisite gate refused the job; nothing was sent.
    #[error("{message}")]
    GateRejected { message: String },
    #[error("an analysis is already in progress")]
    JobInFlight,
    /// Server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },
    #[error("{message}")]
    Network { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("could not connect: {0}")]
    Connect(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("stream timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("stream closed by server")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed json: {0}")]
    Json(String),
    #[error("payload is not a json object")]
    NotAnObject,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}
