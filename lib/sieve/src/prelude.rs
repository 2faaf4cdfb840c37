//! Prelude module for convenient imports.
//!
//! ```ignore
//! use sieve::prelude::*;
//! ```

pub use crate::{
    Body, Error, ErrorTransform, HyperTransport, Response, ResponseExecutor, Result,
    ServiceTransport, StatusCode, StatusError, Transport, TransportConfig,
};

pub use bytes::Bytes;
