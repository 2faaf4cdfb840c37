//! HTTP transport implementation using hyper-util.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt, future, stream};
use http_body_util::{BodyStream, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::time::Instant;
use tower_service::Service;
use tracing::{Instrument, debug, debug_span};

use crate::{Body, Error, Response, Result, Transport, TransportConfig, connector::https_connector};

/// Future type for the Tower Service implementation.
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Transport using hyper-util with connection pooling and TLS.
///
/// The response body is handed over as a stream, never buffered.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use sieve::{HyperTransport, ResponseExecutor, TransportConfig};
///
/// let transport = HyperTransport::with_config(
///     TransportConfig::builder()
///         .timeout(Duration::from_secs(5))
///         .build(),
/// );
/// let executor = ResponseExecutor::new(transport);
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a new transport with custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let connector = https_connector(&config);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build_hyper_request(request: http::Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let uri = request.uri();
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::invalid_request(format!(
                "request URI must be absolute, got '{uri}'"
            )));
        }

        Ok(request.map(Full::new))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = error_chain(&err);

        // Handshake failures surface as connect errors too, so look for rustls first
        if is_tls_failure(&err) {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }

    async fn send_request(&self, request: http::Request<Full<Bytes>>) -> Result<Response> {
        let deadline = Instant::now() + self.config.timeout;

        let response = tokio::time::timeout_at(deadline, self.inner.request(request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let (parts, incoming) = response.into_parts();
        debug!(status = parts.status.as_u16(), "received response head");

        let chunks = BodyStream::new(incoming)
            .map_err(|e| Error::body(e.to_string()))
            .try_filter_map(|frame| future::ready(Ok(frame.into_data().ok())));

        Ok(Response::new(
            parts.status,
            parts.headers,
            Body::from_stream(until_deadline(chunks, deadline)),
        ))
    }
}

/// Ends the stream with [`Error::Timeout`] once `deadline` passes.
fn until_deadline<S>(chunks: S, deadline: Instant) -> impl Stream<Item = Result<Bytes>> + Send + 'static
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
{
    stream::unfold(Some(Box::pin(chunks)), move |state| async move {
        let mut chunks = state?;
        match tokio::time::timeout_at(deadline, chunks.next()).await {
            Ok(Some(chunk)) => Some((chunk, Some(chunks))),
            Ok(None) => None,
            Err(_) => {
                debug!("response body deadline elapsed");
                Some((Err(Error::Timeout), None))
            }
        }
    })
}

/// Display of `err` followed by each of its sources, joined with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !msg.ends_with(&cause_msg) {
            msg.push_str(": ");
            msg.push_str(&cause_msg);
        }
        source = cause.source();
    }
    msg
}

/// Whether a `rustls::Error` sits anywhere in the source chain.
///
/// `io::Error` hides its payload from `source()`, so its inner error is
/// checked explicitly.
fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if cause.is::<rustls::Error>() {
            return true;
        }
        let wraps_rustls = cause
            .downcast_ref::<io::Error>()
            .and_then(io::Error::get_ref)
            .is_some_and(|inner| inner.is::<rustls::Error>());
        if wraps_rustls {
            return true;
        }
        current = cause.source();
    }
    false
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: http::Request<Bytes>) -> Result<Response> {
        let span = debug_span!("http_request", method = %request.method(), uri = %request.uri());

        async move {
            let request = Self::build_hyper_request(request)?;
            self.send_request(request).await
        }
        .instrument(span)
        .await
    }
}

// ============================================================================
// Tower Service Implementation
// ============================================================================

impl Service<http::Request<Bytes>> for HyperTransport {
    type Response = Response;
    type Error = Error;
    type Future = TransportFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.send(request).await })
    }
}
