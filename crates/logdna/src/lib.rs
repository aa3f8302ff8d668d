//! Buffering client for the [LogDNA](https://docs.logdna.com/reference/api) ingest API.
//!
//! Lines are accumulated in memory by [`Client::log`] and shipped in a single JSON batch
//! once the flush limit is reached, or whenever [`Client::flush`] is called.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = logdna::Client::builder()
//!     .api_key("my-ingestion-key")
//!     .hostname("web-1")
//!     .file("nginx")
//!     .build()?;
//!
//! client.log(jiff::Timestamp::now(), "GET /index.html 200");
//! client.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! ### Http backend
//!
//! - [`reqwest`]:
//!   `reqwest` feature gate Use [`reqwest`] as the HTTP backend, but do not enable any TLS features.
//!   - `reqwest-default-tls`: use [`reqwest`] as the HTTP backend and default TLS provider.
//!   - `reqwest-rustls`: use [`reqwest`] as the HTTP backend and [`rustls`] TLS provider.
//!
//! Without any backend enabled, a [`Transport`] must be supplied through
//! [`ClientBuilder::transport`].
//!
//! [`reqwest`]: https://docs.rs/reqwest
//! [`rustls`]: https://docs.rs/rustls
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod proto;
pub mod time;

pub use client::{
    Client, ClientBuilder, ClientBuilderError, ClientError, Config, DEFAULT_FLUSH_LIMIT,
    Endpoint, EndpointError, INGEST_BASE_URL, Response, Transport, TransportError,
};
pub use proto::{LogLine, Payload};

#[cfg(test)]
#[cfg_attr(test, ctor::ctor)]
fn init() {
    // Initialize the tracing subscriber for tests
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .init();
}
