//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use sieve_core::prelude::*;
//! ```

pub use crate::{
    Body, Error, ErrorTransform, IdentityTransform, Response, ResponseExecutor, Result,
    StatusCode, StatusError, Transport, from_json,
};
