use std::collections::VecDeque;

use client_logging::{client_debug, client_info};
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;

use crate::{
    ClientSettings, JobParameters, SseDecoder, SubmissionError, TransportError,
    FALLBACK_REJECTION_MESSAGE,
};

/// Raw stream payloads in arrival order, one per server-sent event.
pub type MessageStream = BoxStream<'static, Result<String, TransportError>>;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send the initiating request.
    async fn submit(&self, params: &JobParameters) -> Result<(), SubmissionError>;

    /// Open the event stream for the job accepted by the last `submit`.
    async fn open_stream(&self) -> Result<MessageStream, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

/// HTTP transport: multipart POST, then a `text/event-stream` GET on the same endpoint.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: ClientSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: ClientSettings) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&settings.base_url)
            .and_then(|base| base.join(&settings.stream_path))
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))?;

        // The server keys the running job by session cookie.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.stream_idle_timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;

        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn submit(&self, params: &JobParameters) -> Result<(), SubmissionError> {
        client_info!(
            "Submitting analysis to {} fields={} files={}",
            self.endpoint,
            params.fields.len(),
            params.files.len()
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.settings.request_timeout)
            .multipart(build_form(params))
            .send()
            .await
            .map_err(|err| SubmissionError::Network {
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorPayload>()
            .await
            .ok()
            .and_then(|payload| payload.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string());
        Err(SubmissionError::Rejected {
            status: Some(status.as_u16()),
            message,
        })
    }

    async fn open_stream(&self) -> Result<MessageStream, TransportError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        client_debug!("Event stream open at {}", self.endpoint);

        let initial = (
            response.bytes_stream().boxed(),
            SseDecoder::new(),
            VecDeque::new(),
        );
        let messages = stream::unfold(initial, |(mut bytes, mut decoder, mut pending)| async move {
            loop {
                if let Some(message) = pending.pop_front() {
                    return Some((Ok(message), (bytes, decoder, pending)));
                }
                match bytes.next().await {
                    Some(Ok(chunk)) => pending.extend(decoder.feed(&chunk)),
                    Some(Err(err)) => {
                        return Some((Err(map_reqwest_error(err)), (bytes, decoder, pending)))
                    }
                    None => return None,
                }
            }
        });
        Ok(messages.boxed())
    }
}

fn build_form(params: &JobParameters) -> Form {
    let mut form = Form::new();
    for (name, value) in &params.fields {
        form = form.text(name.clone(), value.clone());
    }
    for file in &params.files {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        form = form.part(file.field.clone(), part);
    }
    form
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    if err.is_connect() {
        return TransportError::Connect(err.to_string());
    }
    TransportError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::ReqwestTransport;
    use crate::{ClientSettings, TransportError};

    #[test]
    fn endpoint_joins_base_and_path() {
        let transport = ReqwestTransport::new(ClientSettings {
            base_url: "http://localhost:9000/app/".to_string(),
            stream_path: "analyze-stream/".to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        assert_eq!(
            transport.endpoint().as_str(),
            "http://localhost:9000/app/analyze-stream/"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ReqwestTransport::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
