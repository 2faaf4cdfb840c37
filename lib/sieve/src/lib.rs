//! Execute HTTP requests and classify their responses.
//!
//! A [`ResponseExecutor`] sends a prepared request through a [`Transport`],
//! hands back the unread body for statuses below 400, and turns any other
//! status into a client or server error carrying the status code, the request
//! id, and the response text.
//!
//! # Example
//!
//! ```ignore
//! use sieve::prelude::*;
//! use sieve::header::HeaderName;
//!
//! #[derive(Debug, serde::Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let executor = ResponseExecutor::new(HyperTransport::new())
//!     .with_request_id_header(HeaderName::from_static("x-request-id"));
//!
//! let request = http::Request::get("https://api.example.com/users/42").body(Bytes::new())?;
//! match executor.execute_json::<User>(request).await {
//!     Ok(user) => println!("{user:?}"),
//!     Err(err) if err.is_not_found() => println!("no such user ({:?})", err.request_id()),
//!     Err(err) => return Err(err.into()),
//! }
//! ```

mod config;
mod connector;
pub mod prelude;
mod service;
mod transport;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use connector::https_connector;
pub use service::ServiceTransport;
pub use transport::{HyperTransport, TransportFuture};

// Re-export tower for service composition
pub use tower;

// Re-export core types
pub use sieve_core::{
    Body, BodyStream, Error, ErrorTransform, IdentityTransform, Response, ResponseExecutor,
    Result, StatusError, Transport, from_json,
};

// Re-export http types for status codes and headers
pub use sieve_core::{StatusCode, header};
