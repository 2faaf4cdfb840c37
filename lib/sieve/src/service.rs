//! Adapter turning a Tower service into a [`Transport`].
//!
//! This lets a [`crate::ResponseExecutor`] sit on top of any middleware stack
//! built with [`tower::ServiceBuilder`], as long as the stack keeps sieve's
//! [`Response`] and [`Error`] types.

use std::future::Future;

use bytes::Bytes;
use tower::ServiceExt;
use tower_service::Service;

use crate::{Error, Response, Result, Transport};

/// [`Transport`] backed by a cloneable Tower service.
///
/// Each call clones the service and drives it with
/// [`ServiceExt::oneshot`], so readiness is awaited and no state is shared
/// between concurrent calls.
///
/// # Example
///
/// ```ignore
/// use sieve::{HyperTransport, ResponseExecutor, ServiceTransport};
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .map_request(|mut request: http::Request<bytes::Bytes>| {
///         request.headers_mut().insert("user-agent", "sieve".parse().unwrap());
///         request
///     })
///     .service(HyperTransport::new());
///
/// let executor = ResponseExecutor::new(ServiceTransport::new(service));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceTransport<S> {
    service: S,
}

impl<S> ServiceTransport<S> {
    /// Wrap a service.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// The wrapped service.
    #[must_use]
    pub const fn get_ref(&self) -> &S {
        &self.service
    }

    /// Consume into the wrapped service.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S> Transport for ServiceTransport<S>
where
    S: Service<http::Request<Bytes>, Response = Response, Error = Error> + Clone + Send + Sync,
    S::Future: Send,
{
    fn send(&self, request: http::Request<Bytes>) -> impl Future<Output = Result<Response>> + Send {
        self.service.clone().oneshot(request)
    }
}
