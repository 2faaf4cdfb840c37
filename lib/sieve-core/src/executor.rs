//! Response execution and classification.
//!
//! [`ResponseExecutor`] sends a request through a [`Transport`] and turns the
//! outcome into either an unread [`Body`] or a single [`Error`]:
//!
//! - transport failures are returned unchanged,
//! - a status below 400 yields the body, untouched,
//! - a status of 400 or above is read, classified as [`Error::Client`] or
//!   [`Error::Server`], and passed through the configured [`ErrorTransform`].
//!
//! The decoding helpers ([`ResponseExecutor::execute_json`],
//! [`ResponseExecutor::execute_string`], [`ResponseExecutor::execute_void`])
//! own the body once `execute` succeeds and drop it before returning.

use bytes::Bytes;
use http::{HeaderMap, StatusCode, header::HeaderName};
use tracing::{Instrument, debug, debug_span, warn};

use crate::{Body, Error, ErrorTransform, IdentityTransform, Result, StatusError, Transport};

/// Executes requests and interprets their responses.
///
/// The executor only holds immutable configuration, so a single instance can
/// be shared between tasks.
///
/// # Example
///
/// ```ignore
/// use sieve::{HyperTransport, ResponseExecutor, header::HeaderName};
///
/// let executor = ResponseExecutor::new(HyperTransport::new())
///     .with_request_id_header(HeaderName::from_static("x-request-id"))
///     .with_error_transform(|_status, err| err);
///
/// let user: User = executor.execute_json(request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ResponseExecutor<T, E = IdentityTransform> {
    transport: T,
    error_transform: E,
    request_id_header: Option<HeaderName>,
}

impl<T: Transport> ResponseExecutor<T> {
    /// Creates an executor that returns classified errors unchanged and
    /// does not look for a request id.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            error_transform: IdentityTransform,
            request_id_header: None,
        }
    }
}

impl<T, E> ResponseExecutor<T, E> {
    /// Replace the transform applied to classified status errors.
    #[must_use]
    pub fn with_error_transform<E2: ErrorTransform>(self, error_transform: E2) -> ResponseExecutor<T, E2> {
        ResponseExecutor {
            transport: self.transport,
            error_transform,
            request_id_header: self.request_id_header,
        }
    }

    /// Set the response header holding the request identifier.
    #[must_use]
    pub fn with_request_id_header(mut self, name: HeaderName) -> Self {
        self.request_id_header = Some(name);
        self
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The response header holding the request identifier, if configured.
    #[must_use]
    pub const fn request_id_header(&self) -> Option<&HeaderName> {
        self.request_id_header.as_ref()
    }

    fn request_id(&self, headers: &HeaderMap) -> String {
        self.request_id_header
            .as_ref()
            .and_then(|name| headers.get(name))
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default()
    }
}

impl<T, E> ResponseExecutor<T, E>
where
    T: Transport,
    E: ErrorTransform,
{
    /// Send the request and return the unread response body.
    ///
    /// The caller owns the returned body; dropping it releases the connection.
    ///
    /// # Errors
    ///
    /// - the transport error, unchanged, if no response was received
    /// - the transformed [`Error::Client`] / [`Error::Server`] if the status is 400 or above
    pub async fn execute(&self, request: http::Request<Bytes>) -> Result<Body> {
        let span = debug_span!("sieve_execute", method = %request.method(), uri = %request.uri());

        async move {
            debug!("sending request");
            let response = self
                .transport
                .send(request)
                .await
                .inspect_err(|err| warn!(error = %err, "transport failed"))?;

            let (status, headers, body) = response.into_parts();
            if status.as_u16() < 400 {
                debug!(status = status.as_u16(), "request succeeded");
                return Ok(body);
            }

            let request_id = self.request_id(&headers);
            let message = error_message(status, body).await;
            warn!(
                status = status.as_u16(),
                request_id = request_id.as_str(),
                "request failed with HTTP error"
            );

            let error = StatusError::new(status, request_id, message).classify();
            Err(self.error_transform.transform(status, error))
        }
        .instrument(span)
        .await
    }

    /// Send the request and deserialize the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::execute`], or a decode error
    /// ([`Error::is_decode`]) if the body cannot be read or parsed.
    pub async fn execute_json<R: serde::de::DeserializeOwned>(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<R> {
        let body = self.execute(request).await?;
        body.json().await
    }

    /// Send the request and read the response body as text.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::execute`], or a decode error if the body
    /// cannot be read or is not valid UTF-8.
    pub async fn execute_string(&self, request: http::Request<Bytes>) -> Result<String> {
        let body = self.execute(request).await?;
        body.text().await
    }

    /// Send the request and collect the raw response body.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::execute`], or a decode error if the body
    /// cannot be read.
    pub async fn execute_bytes(&self, request: http::Request<Bytes>) -> Result<Bytes> {
        let body = self.execute(request).await?;
        body.bytes().await
    }

    /// Send the request and discard the response body.
    ///
    /// Errors while draining the body are ignored: only transport and status
    /// failures are reported.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::execute`].
    pub async fn execute_void(&self, request: http::Request<Bytes>) -> Result<()> {
        let body = self.execute(request).await?;
        if let Err(err) = body.drain().await {
            debug!(error = %err, "ignoring error while draining response body");
        }
        Ok(())
    }
}

/// Best-effort message for a failed response: the body text, or the reason phrase.
async fn error_message(status: StatusCode, body: Body) -> String {
    match body.text_lossy().await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => status_phrase(status),
        Err(err) => {
            debug!(error = %err, "failed to read error response body");
            status_phrase(status)
        }
    }
}

fn status_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}
