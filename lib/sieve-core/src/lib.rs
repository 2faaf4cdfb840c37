//! Core types and traits for sieve HTTP response handling.
//!
//! This crate provides the foundational types used by sieve:
//! - [`Transport`] - One-method trait performing the network exchange
//! - [`ResponseExecutor`] - Sends requests and classifies responses
//! - [`Response`] and [`Body`] - Response head and streaming body
//! - [`Error`], [`StatusError`] and [`Result`] - Error handling
//! - [`ErrorTransform`] - Hook to remap classified status errors
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod error;
mod executor;
pub mod prelude;
mod response;
mod transport;

pub use body::{Body, BodyStream, from_json};
pub use error::{Error, ErrorTransform, IdentityTransform, Result, StatusError};
pub use executor::ResponseExecutor;
pub use response::Response;
pub use transport::Transport;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
