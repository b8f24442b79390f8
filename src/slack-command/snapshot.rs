//! Buffered view of an inbound request.
//!
//! Signature verification needs the raw body bytes, and form parsing needs
//! them again afterwards. The body is read into memory once and every
//! consumer gets its own reader over that buffer.

use std::io::{Cursor, Read};

use bytes::Bytes;
use http::HeaderMap;

use crate::error::{Result, VerifyFailure};

#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    headers: HeaderMap,
    body: Bytes,
}

impl RequestSnapshot {
    pub fn new(headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Drain `reader` to the end. A read failure rejects the request.
    pub fn capture<R: Read>(headers: HeaderMap, mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| VerifyFailure::UnreadableBody(e.to_string()))?;
        Ok(Self::new(headers, buf))
    }

    /// Snapshot a request whose body is already in memory.
    pub fn from_request<B: AsRef<[u8]>>(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts.headers, Bytes::copy_from_slice(body.as_ref()))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header value as text. Missing or non-UTF-8 values read as "".
    pub fn header_str(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// A fresh reader positioned at the start of the body.
    pub fn reader(&self) -> impl Read {
        Cursor::new(self.body.clone())
    }

    /// Rebuild a request carrying the preserved body.
    pub fn into_request(self) -> http::Request<Bytes> {
        let mut req = http::Request::new(self.body);
        *req.headers_mut() = self.headers;
        req
    }
}
