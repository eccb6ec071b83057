//! HTTP transport shared by every backend adapter.

mod decoder;
mod retry;

pub use decoder::NdjsonDecoder;
pub use retry::RetryPolicy;

use edugenie_core::StreamHandler;
use edugenie_error::{BackendError, BackendErrorKind, BackendResult, RetryableError};
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, instrument, trace, warn};

/// A generation endpoint and its credentials.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Endpoint {
    /// Full request URL
    url: String,
    /// Bearer token sent in the `Authorization` header
    bearer: Option<String>,
}

impl Endpoint {
    /// An endpoint without authentication.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer: None,
        }
    }

    /// Returns the endpoint with a bearer token attached.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A decoded response object carrying generated text.
///
/// Non-streaming calls decode the whole body as one envelope; streaming calls
/// decode one envelope per line.
pub trait TextEnvelope: DeserializeOwned {
    /// The generated text (or fragment) carried by this envelope.
    fn text(&self) -> Option<&str>;

    /// True when this envelope signals the end of a stream.
    fn is_done(&self) -> bool {
        false
    }

    /// Failure message reported in-band by the backend.
    fn error(&self) -> Option<&str> {
        None
    }
}

/// Issues generation requests and decodes their responses.
///
/// Only the send phase is retried, and only when the backend could not be
/// reached at all. Once a response arrives its status is final.
#[derive(Debug, Clone)]
pub struct GenerateTransport {
    client: Client,
    retry: RetryPolicy,
}

impl GenerateTransport {
    /// Creates a transport over a shared HTTP client.
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The retry policy applied to the send phase.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Posts `body` as JSON and returns the response if its status is a success.
    ///
    /// # Errors
    ///
    /// - [`BackendErrorKind::Unreachable`] when every attempt failed to connect
    /// - [`BackendErrorKind::Http`] for a non-success status, with a body excerpt
    #[instrument(skip(self, body), fields(url = %endpoint.url()))]
    pub async fn send<B>(&self, endpoint: &Endpoint, body: &B) -> BackendResult<Response>
    where
        B: Serialize + Sync,
    {
        let response = Retry::spawn(self.retry.strategy(), move || async move {
            self.send_once(endpoint, body).await.map_err(|e| {
                if e.is_retryable() {
                    warn!(url = %endpoint.url(), error = %e.kind, "Backend unreachable, will retry");
                    RetryError::transient(e)
                } else {
                    RetryError::permanent(e)
                }
            })
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(url = %endpoint.url(), status = %status, "Backend returned error status");
            return Err(BackendError::http(status.as_u16(), &body));
        }

        debug!(status = %status, "Backend accepted request");
        Ok(response)
    }

    async fn send_once<B>(&self, endpoint: &Endpoint, body: &B) -> BackendResult<Response>
    where
        B: Serialize + Sync,
    {
        let mut request = self.client.post(endpoint.url()).json(body);
        if let Some(token) = endpoint.bearer() {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            if e.is_builder() {
                BackendError::new(BackendErrorKind::Request(e.to_string()))
            } else {
                BackendError::new(BackendErrorKind::Unreachable {
                    url: endpoint.url().clone(),
                    message: e.to_string(),
                })
            }
        })
    }

    /// Sends a request and decodes the complete body as one envelope.
    ///
    /// # Errors
    ///
    /// Besides the [`send`](Self::send) errors, fails with
    /// [`BackendErrorKind::Generation`] when the envelope carries an error and
    /// [`BackendErrorKind::EmptyResponse`] when it carries no text.
    #[instrument(skip(self, body), fields(url = %endpoint.url()))]
    pub async fn call<B, E>(&self, endpoint: &Endpoint, body: &B) -> BackendResult<String>
    where
        B: Serialize + Sync,
        E: TextEnvelope,
    {
        let response = self.send(endpoint, body).await?;
        let bytes = response.bytes().await.map_err(|e| {
            BackendError::new(BackendErrorKind::Request(format!(
                "Failed to read response body: {}",
                e
            )))
        })?;

        let envelope: E = serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, "Response body is not a valid envelope");
            BackendError::new(BackendErrorKind::Request(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        if let Some(message) = envelope.error() {
            error!(message, "Backend reported an error");
            return Err(BackendError::new(BackendErrorKind::Generation(message.to_string())));
        }

        match envelope.text() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => {
                warn!("Backend response carried no generated text");
                Err(BackendError::new(BackendErrorKind::EmptyResponse))
            }
        }
    }

    /// Sends a request and decodes the body as newline-delimited envelopes.
    ///
    /// Each non-empty fragment is handed to `handler` as soon as its line is
    /// complete. Resolves with the concatenated fragments when an envelope
    /// signals completion or the connection closes.
    ///
    /// The handler's cancellation token is honoured from the first connection
    /// attempt on, including retry backoff and the wait for response headers.
    ///
    /// # Errors
    ///
    /// Besides the [`send`](Self::send) errors, fails with
    /// [`BackendErrorKind::Cancelled`] when the handler's token is cancelled,
    /// [`BackendErrorKind::Unreachable`] when the connection drops,
    /// [`BackendErrorKind::Generation`] when a line carries an error and
    /// [`BackendErrorKind::EmptyResponse`] when no text arrives at all.
    #[instrument(skip(self, body, handler), fields(url = %endpoint.url()))]
    pub async fn stream<B, E>(
        &self,
        endpoint: &Endpoint,
        body: &B,
        mut handler: StreamHandler<'_>,
    ) -> BackendResult<String>
    where
        B: Serialize + Sync,
        E: TextEnvelope,
    {
        let cancel = handler.cancellation().cloned();
        let sending = self.send(endpoint, body);
        let response = match &cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Request cancelled before the backend answered");
                    return Err(BackendError::new(BackendErrorKind::Cancelled));
                }
                response = sending => response?,
            },
            None => sending.await?,
        };
        let mut chunks = std::pin::pin!(response.bytes_stream());
        let mut decoder = NdjsonDecoder::new();
        let mut text = String::new();
        let mut done = false;

        while !done {
            let next = match &cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    chunk = chunks.next() => Some(chunk),
                },
                None => Some(chunks.next().await),
            };

            let chunk = match next {
                None => {
                    debug!(received = text.len(), "Stream cancelled by caller");
                    return Err(BackendError::new(BackendErrorKind::Cancelled));
                }
                Some(None) => break,
                Some(Some(chunk)) => chunk.map_err(|e| {
                    error!(error = %e, "Stream interrupted");
                    BackendError::new(BackendErrorKind::Unreachable {
                        url: endpoint.url().clone(),
                        message: e.to_string(),
                    })
                })?,
            };

            trace!(bytes = chunk.len(), "Received chunk");
            for envelope in decoder.push::<E>(&chunk) {
                done |= deliver(&envelope, &mut handler, &mut text)?;
            }
        }

        if !done {
            if let Some(envelope) = decoder.finish::<E>() {
                deliver(&envelope, &mut handler, &mut text)?;
            }
        }

        if text.is_empty() {
            warn!("Stream ended without generated text");
            return Err(BackendError::new(BackendErrorKind::EmptyResponse));
        }

        debug!(length = text.len(), "Stream complete");
        Ok(text)
    }
}

/// Hands one envelope's fragment to the handler. Returns whether the stream
/// is finished.
fn deliver<E: TextEnvelope>(
    envelope: &E,
    handler: &mut StreamHandler<'_>,
    text: &mut String,
) -> BackendResult<bool> {
    if let Some(message) = envelope.error() {
        error!(message, received = text.len(), "Backend reported an error mid-stream");
        return Err(BackendError::new(BackendErrorKind::Generation(message.to_string())));
    }
    if let Some(fragment) = envelope.text().filter(|f| !f.is_empty()) {
        trace!(fragment, "Token");
        handler.emit(fragment);
        text.push_str(fragment);
    }
    Ok(envelope.is_done())
}
