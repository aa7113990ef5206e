//! Adjudicator core: pure progress state machine and view-model helpers.
mod event;
mod gate;
mod intent;
mod reduce;
mod stage;
mod state;
mod view_model;

pub use event::DecodedEvent;
pub use gate::{CreditGate, DEFAULT_GATE_MESSAGE};
pub use intent::{persist_intents, Intent, StorageKey, REDIRECT_DELAY};
pub use reduce::{
    connection_lost, reduce, submission_failed, COMPLETE_MESSAGE, CONNECTION_LOST_MESSAGE,
    DEFAULT_ERROR_MESSAGE,
};
pub use stage::{stage_text, PreviewSlot, Stage};
pub use state::{Outcome, ProgressState, ResultSlots};
pub use view_model::ProgressView;
