//! Transport trait.
//!
//! A [`Transport`] performs the actual network exchange for a prepared
//! request. The [`crate::ResponseExecutor`] only interprets what it returns,
//! so any implementation works: a real HTTP stack, a tower service, or a
//! test double.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Response, Result};

/// Core transport trait.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use sieve_core::{Response, Result, StatusCode, Transport};
///
/// struct Fixed;
///
/// impl Transport for Fixed {
///     async fn send(&self, _request: http::Request<Bytes>) -> Result<Response> {
///         Ok(http::Response::builder()
///             .status(StatusCode::OK)
///             .body("pong")
///             .expect("valid response")
///             .into())
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Send a request and return the response head with an unread body.
    ///
    /// # Errors
    ///
    /// Returns an error when no response could be obtained:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn send(&self, request: http::Request<Bytes>) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport> Transport for &T {
    fn send(&self, request: http::Request<Bytes>) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: http::Request<Bytes>) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}
