//! Opt-in request dumps for debugging signature problems.
//!
//! These dump raw headers and bodies, which may include tokens. Nothing is
//! recorded unless a sink is attached to the handler.

use std::io::Write;
use std::sync::Mutex;

use http::HeaderMap;

pub trait DiagnosticSink: Send + Sync {
    fn dump(&self, headers: &HeaderMap, body: &[u8]);
}

/// Writes a plain-text dump to any writer. Write errors are dropped.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> DiagnosticSink for WriterSink<W> {
    fn dump(&self, headers: &HeaderMap, body: &[u8]) {
        let mut w = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = w.write_all(b"=======Header=====\n");
        for (name, value) in headers {
            let _ = writeln!(w, "{}:{}", name, String::from_utf8_lossy(value.as_bytes()));
        }
        let _ = w.write_all(b"=======Payload=====\n");
        let _ = w.write_all(body);
        let _ = w.flush();
    }
}

/// Emits the dump as a `debug` level tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn dump(&self, headers: &HeaderMap, body: &[u8]) {
        tracing::debug!(
            headers = ?headers,
            body = %String::from_utf8_lossy(body),
            "inbound slack request"
        );
    }
}
