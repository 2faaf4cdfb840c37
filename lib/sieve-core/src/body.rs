//! Streaming response bodies and decoding utilities.
//!
//! A [`Body`] is an exclusively owned stream of [`Bytes`] chunks. Dropping it
//! releases the underlying connection resources, so every consuming helper
//! takes `self` and the body is released exactly once, whatever the outcome.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::{StreamExt, stream};

use crate::{Error, Result};

/// Boxed stream of body chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// HTTP response body, read incrementally.
///
/// # Example
///
/// ```
/// use sieve_core::Body;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> sieve_core::Result<()> {
/// let body = Body::from("Hello, World!");
/// assert_eq!(body.text().await?, "Hello, World!");
/// # Ok(())
/// # }
/// ```
pub struct Body {
    stream: BodyStream,
}

impl Body {
    /// A body with no content.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// Wrap a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Consume into the underlying chunk stream.
    #[must_use]
    pub fn into_stream(self) -> BodyStream {
        self.stream
    }

    /// Read the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error; the remaining chunks are discarded.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut collected = BytesMut::new();
        while let Some(chunk) = self.stream.next().await {
            collected.extend_from_slice(&chunk?);
        }
        Ok(collected.freeze())
    }

    /// Read the whole body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk cannot be read or the body is not valid UTF-8.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(Into::into)
    }

    /// Read the whole body as text, replacing invalid UTF-8 sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk cannot be read.
    pub async fn text_lossy(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the whole body and deserialize it as JSON.
    ///
    /// The body is consumed entirely before decoding, so nothing is left
    /// unread when decoding fails. Content after the first JSON value is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk cannot be read or deserialization fails.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        from_json(&bytes)
    }

    /// Read and discard the remaining content, returning the number of bytes skipped.
    ///
    /// # Errors
    ///
    /// Returns the first chunk error.
    pub async fn drain(mut self) -> Result<u64> {
        let mut skipped = 0_u64;
        while let Some(chunk) = self.stream.next().await {
            skipped += chunk?.len() as u64;
        }
        Ok(skipped)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl Stream for Body {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::empty()
        } else {
            Self::from_stream(stream::once(async move { Ok(bytes) }))
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
///
/// # Example
///
/// ```
/// use sieve_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let bytes = br#"{"name":"Alice"}"#;
/// let user: User = from_json(bytes).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}
