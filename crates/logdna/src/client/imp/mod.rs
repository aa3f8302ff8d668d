use std::fmt;

#[cfg(feature = "reqwest")]
mod reqwest;
#[cfg(feature = "reqwest")]
pub(crate) use self::reqwest::HttpClient;

/// Error raised by a [`Transport`] when a request could not be completed.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A blocking HTTP transport able to issue a single POST.
///
/// The client calls [`post`](Transport::post) exactly once per flush and never retries.
/// Implementations decide on their own connection reuse and timeouts; the client imposes none.
pub trait Transport: Send + Sync + 'static {
    /// POST `body` to `url` with the given content type and return the response.
    ///
    /// `url` may carry a credential in its user-info component.
    fn post(
        &self,
        url: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<Response, TransportError>;
}

/// Status and body of an ingest response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body, empty if it could not be read.
    pub body: String,
}

impl Response {
    /// Whether the ingest API accepted the batch.
    pub fn is_accepted(&self) -> bool {
        self.status == 200
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.body)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "reqwest")] {
        /// Build the transport used when none is configured.
        pub(crate) fn default_transport() -> Option<Result<Box<dyn Transport>, TransportError>> {
            Some(HttpClient::new().map(|client| Box::new(client) as Box<dyn Transport>))
        }
    } else {
        /// No HTTP backend is compiled in.
        pub(crate) fn default_transport() -> Option<Result<Box<dyn Transport>, TransportError>> {
            None
        }
    }
}
