//! LogDNA ingest client

pub use self::builder::{ClientBuilder, ClientBuilderError, Config, DEFAULT_FLUSH_LIMIT};
pub use self::endpoint::{Endpoint, EndpointError, INGEST_BASE_URL};
pub use self::imp::{Response, Transport, TransportError};
use crate::{LogLine, Payload, time::Clock};
use compact_str::CompactString;
use jiff::Timestamp;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use tracing::{Level, Span};

mod builder;
mod endpoint;
mod headers;
mod imp;

/// A buffering client for the LogDNA ingest API.
///
/// Cloning is cheap; all clones share the same buffer.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    state: Mutex<State>,
    /// Mirror of the buffer length, only written while `state` is locked.
    size: AtomicUsize,
    flush_limit: usize,
    file: CompactString,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    enable_trace: bool,
    print_internal_error: bool,
}

struct State {
    payload: Payload,
    endpoint: Endpoint,
    /// Failure of the last flush triggered from [`Client::log`], until taken.
    flush_error: Option<ClientError>,
}

/// Error type for flush operations.
///
/// In every case the buffered lines are retained and a later flush will send them again.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
    /// Non-200 response from the ingest API.
    #[error("http error [{status}] {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: Box<str>,
    },
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a [`Config`], using the default transport and clock.
    pub fn new(config: Config) -> Result<Self, ClientBuilderError> {
        ClientBuilder::from(config).build()
    }

    /// Buffer a log line stamped with `timestamp`.
    ///
    /// Once the buffer reaches the flush limit, the lines are flushed on the calling thread.
    /// The limit is checked after the buffer lock is released, so concurrent producers may push
    /// the buffer a few lines past it before the flush drains it.
    ///
    /// Failures of that flush are not returned here, see [`take_flush_error`](Self::take_flush_error).
    pub fn log(&self, timestamp: Timestamp, message: impl Into<String>) {
        let line = LogLine::new(timestamp, message, self.inner.file.clone());
        {
            let mut state = self.inner.lock();
            state.payload.push(line);
            self.inner.size.store(state.payload.len(), Ordering::Relaxed);
        }

        if self.size() >= self.inner.flush_limit {
            if let Err(e) = self.flush() {
                self.inner.report_internal_error(&e);
                self.inner.lock().flush_error = Some(e);
            }
        }
    }

    /// Number of lines waiting to be sent.
    ///
    /// This is an unsynchronized snapshot and may already be stale when it returns.
    pub fn size(&self) -> usize {
        self.inner.size.load(Ordering::Relaxed)
    }

    /// The flush limit in effect.
    pub fn flush_limit(&self) -> usize {
        self.inner.flush_limit
    }

    /// Send all buffered lines and clear the buffer.
    ///
    /// Returns immediately if nothing is buffered. On any error the buffer is left untouched.
    pub fn flush(&self) -> Result<(), ClientError> {
        if self.size() == 0 {
            return Ok(());
        }

        let span = if self.inner.enable_trace {
            tracing::span!(Level::TRACE, "flush", limit = self.inner.flush_limit)
        } else {
            Span::none()
        };
        let _enter = span.enter();

        let mut state = self.inner.lock();
        // drained by a concurrent flush while we waited
        if state.payload.is_empty() {
            return Ok(());
        }

        let body = state.payload.encode()?;
        let lines = state.payload.len();
        let bytes = body.len();
        let url = state.endpoint.refresh_at(self.inner.clock.now());

        let res = self
            .inner
            .transport
            .post(&url, headers::DEFAULT_CONTENT_TYPE, body)
            .map_err(ClientError::Transport)?;
        if self.inner.enable_trace {
            tracing::trace!(status = res.status, res = %res.body);
        }
        if !res.is_accepted() {
            return Err(ClientError::Service {
                status: res.status,
                message: res.body.into_boxed_str(),
            });
        }

        state.payload.clear();
        self.inner.size.store(0, Ordering::Relaxed);
        if self.inner.enable_trace {
            tracing::debug!(
                lines,
                bytes,
                hostname = state.endpoint.hostname(),
                "flushed"
            );
        }
        Ok(())
    }

    /// Take the error of the last failed flush triggered by [`log`](Self::log).
    ///
    /// A newer failure replaces an older one that was never taken.
    pub fn take_flush_error(&self) -> Option<ClientError> {
        self.inner.lock().flush_error.take()
    }

    /// Close the client, sending any buffered lines.
    pub fn close(self) -> Result<(), ClientError> {
        self.flush()
    }
}

impl ClientInner {
    fn lock(&self) -> MutexGuard<'_, State> {
        // every mutation is a single push or clear, the state is consistent even after a panic
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report_internal_error(&self, e: &ClientError) {
        if self.enable_trace {
            tracing::warn!(err = ?e, "implicit flush failed");
        } else if self.print_internal_error {
            eprintln!("[logdna] error flushing logs: {e}");
        }
    }
}
