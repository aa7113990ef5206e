//! Adjudicator client: connection lifecycle, stream decoding and effect execution.
mod controller;
mod decode;
mod persist;
mod sse;
mod transport;
mod types;

pub use controller::{ConnectionController, ProgressSink};
pub use decode::decode_event;
pub use persist::{
    ensure_storage_dir, DurableStore, FileStore, MemoryStore, PersistError, STORAGE_FILENAME,
};
pub use sse::SseDecoder;
pub use transport::{MessageStream, ReqwestTransport, Transport};
pub use types::{
    ClientSettings, DecodeError, FilePart, JobParameters, SubmissionError, TransportError,
    DEBATE_TEXT_FIELD, FALLBACK_REJECTION_MESSAGE,
};
