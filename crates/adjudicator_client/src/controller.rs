use std::mem;
use std::sync::Arc;
use std::time::Duration;

use adjudicator_core::{
    connection_lost, persist_intents, reduce, submission_failed, CreditGate, Intent,
    ProgressState,
};
use client_logging::{client_debug, client_error, client_info, client_trace, client_warn};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    decode_event, DurableStore, JobParameters, MessageStream, SubmissionError, Transport,
    TransportError,
};

/// Host side of the projection: receives state snapshots and UI intents.
pub trait ProgressSink: Send + Sync {
    fn render(&self, state: &ProgressState);

    /// UI-facing intents (re-enable submission, show preview, errored bar).
    fn perform(&self, _intent: &Intent) {}

    /// Fired by the redirect timer after a successful job.
    fn navigate(&self, _target: &str) {}
}

struct PendingRedirect {
    cancel: CancellationToken,
    handle: JoinHandle<bool>,
}

/// Owns one job's network lifecycle and the single live `ProgressState`.
pub struct ConnectionController {
    transport: Box<dyn Transport>,
    store: Arc<dyn DurableStore>,
    sink: Arc<dyn ProgressSink>,
    state: ProgressState,
    stream: Option<MessageStream>,
    redirect: Option<PendingRedirect>,
}

impl ConnectionController {
    pub fn new(
        transport: impl Transport + 'static,
        store: Arc<dyn DurableStore>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            store,
            sink,
            state: ProgressState::new(),
            stream: None,
            redirect: None,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn has_pending_redirect(&self) -> bool {
        self.redirect
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Start a job. Gate and in-flight checks run before anything is touched.
    pub async fn submit(
        &mut self,
        params: &JobParameters,
        gate: Option<&CreditGate>,
    ) -> Result<(), SubmissionError> {
        if let Some(gate) = gate.filter(|gate| !gate.permits()) {
            client_info!(
                "Submission blocked by gate available={} minimum={}",
                gate.available,
                gate.minimum
            );
            return Err(SubmissionError::GateRejected {
                message: gate.message.clone(),
            });
        }
        if self.state.is_active() {
            client_warn!("Submission ignored: a job is already in flight");
            return Err(SubmissionError::JobInFlight);
        }

        self.cancel_redirect();
        self.close_stream();
        self.state = ProgressState::begin_job();
        self.sink.render(&self.state);

        if let Err(err) = self.transport.submit(params).await {
            client_warn!("Submission failed: {}", err);
            let (state, intents) = submission_failed(mem::take(&mut self.state), &err.to_string());
            self.state = state;
            self.execute(intents);
            return Err(err);
        }

        match self.transport.open_stream().await {
            Ok(stream) => {
                client_info!("Analysis accepted, listening for progress");
                self.stream = Some(stream);
            }
            Err(err) => self.handle_transport_error(err),
        }
        Ok(())
    }

    /// Pump the active stream in arrival order until it is closed.
    pub async fn run(&mut self) {
        while let Some(stream) = self.stream.as_mut() {
            let next = stream.next().await;
            match next {
                Some(Ok(payload)) => self.handle_payload(&payload),
                Some(Err(err)) => self.handle_transport_error(err),
                None => self.handle_transport_error(TransportError::Closed),
            }
        }
    }

    /// Wait for a scheduled redirect. Returns whether navigation happened.
    pub async fn wait_for_redirect(&mut self) -> bool {
        let Some(pending) = self.redirect.take() else {
            return false;
        };
        pending.handle.await.unwrap_or(false)
    }

    /// Tear down: close the stream and cancel a redirect that has not fired yet.
    pub fn shutdown(&mut self) {
        self.cancel_redirect();
        self.close_stream();
    }

    fn handle_payload(&mut self, payload: &str) {
        let event = match decode_event(payload) {
            Ok(event) => event,
            Err(err) => {
                client_warn!("Dropping undecodable stream message ({}): {:?}", err, payload);
                return;
            }
        };
        if event.heartbeat {
            client_trace!("heartbeat");
            return;
        }

        let previous = self.state.outcome().clone();
        let (state, mut intents) = reduce(mem::take(&mut self.state), event);
        self.state = state;
        if self.state.outcome() != &previous {
            intents.extend(persist_intents(self.state.outcome()));
        }
        self.execute(intents);
    }

    fn handle_transport_error(&mut self, err: TransportError) {
        if self.state.is_active() {
            client_error!("Stream connection lost: {}", err);
        } else {
            client_debug!("Ignoring stream error after job ended: {}", err);
        }
        let (state, intents) = connection_lost(mem::take(&mut self.state));
        self.state = state;
        self.execute(intents);
    }

    fn execute(&mut self, intents: Vec<Intent>) {
        for intent in intents {
            match intent {
                Intent::CloseStream => self.close_stream(),
                Intent::ScheduleRedirect { target, delay } => self.schedule_redirect(target, delay),
                Intent::Persist { key, value } => {
                    if let Err(err) = self.store.set(key, &value) {
                        client_error!("Failed to persist {}: {}", key.as_str(), err);
                    }
                }
                other => self.sink.perform(&other),
            }
        }
        self.sink.render(&self.state);
    }

    fn schedule_redirect(&mut self, target: String, delay: Duration) {
        self.cancel_redirect();
        client_info!("Redirecting to {} in {:?}", target, delay);

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let sink = self.sink.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(delay) => {
                    sink.navigate(&target);
                    true
                }
            }
        });
        self.redirect = Some(PendingRedirect { cancel, handle });
    }

    fn cancel_redirect(&mut self) {
        if let Some(pending) = self.redirect.take() {
            pending.cancel.cancel();
        }
    }

    fn close_stream(&mut self) {
        if self.stream.take().is_some() {
            client_debug!("Event stream closed");
        }
    }
}

impl Drop for ConnectionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
