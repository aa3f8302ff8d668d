use crate::{
    Payload,
    client::{Client, ClientInner, State, endpoint, imp},
    time::{Clock, SystemClock},
};
use std::{
    ffi::OsString,
    io,
    sync::{Arc, Mutex, atomic::AtomicUsize},
};

/// Number of buffered lines that triggers a flush when no limit is configured.
pub const DEFAULT_FLUSH_LIMIT: usize = 5000;

/// Builder error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientBuilderError {
    /// The API key is missing or empty.
    #[error("missing api key")]
    MissingCredential,
    /// No hostname was configured and none could be resolved from the system.
    #[error("missing hostname and none could be resolved")]
    MissingIdentity,
    /// The ingest endpoint could not be built.
    #[error(transparent)]
    InvalidAddress(#[from] endpoint::EndpointError),
    /// Missing required field in the builder.
    #[error("missing required field: {0}")]
    Missing(&'static str),
    /// The default HTTP transport could not be created.
    #[error("failed to create http transport: {0}")]
    Transport(#[source] imp::TransportError),
}

type Result<T, E = ClientBuilderError> = std::result::Result<T, E>;

/// Plain client configuration.
///
/// Use [`Client::new`] for the defaults, or [`ClientBuilder`] to also set the transport,
/// clock or endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Ingestion key, embedded in the request target.
    pub api_key: String,
    /// Origin identity; the system hostname is used when `None` or empty.
    pub hostname: Option<String>,
    /// Source file or app label stamped on every line.
    pub file: Option<String>,
    /// Flush limit; `0` means [`DEFAULT_FLUSH_LIMIT`].
    pub flush_limit: usize,
}

/// Builder for creating a client with required and optional parameters.
pub struct ClientBuilder {
    config: Config,
    base_url: String,
    transport: Option<Box<dyn imp::Transport>>,
    clock: Box<dyn Clock>,
    enable_trace: bool,
    print_internal_error: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            base_url: endpoint::INGEST_BASE_URL.to_string(),
            transport: None,
            clock: Box::new(SystemClock),
            enable_trace: true,
            print_internal_error: false,
        }
    }
}

impl From<Config> for ClientBuilder {
    fn from(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

impl ClientBuilder {
    /// Set the ingestion key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Set the hostname lines appear from.
    ///
    /// Defaults to the system hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.config.hostname = Some(hostname.into());
        self
    }

    /// Set the source file or app label lines appear as.
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.config.file = Some(file.into());
        self
    }

    /// Set the number of buffered lines that triggers a flush.
    ///
    /// `0` restores the default of [`DEFAULT_FLUSH_LIMIT`].
    pub fn flush_limit(mut self, flush_limit: usize) -> Self {
        self.config.flush_limit = flush_limit;
        self
    }

    /// Override the ingest endpoint base address.
    ///
    /// Defaults to [`INGEST_BASE_URL`](endpoint::INGEST_BASE_URL).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a custom transport instead of the built-in HTTP backend.
    pub fn transport(mut self, transport: impl imp::Transport) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Use a custom clock for the `now` request parameter.
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Enable or disable tracing for the client.
    ///
    /// Enabled by default.
    /// If enabled, client will log via [`tracing`](https://docs.rs/tracing/latest/tracing/) crate.
    pub fn enable_trace(mut self, enable_trace: bool) -> Self {
        self.enable_trace = enable_trace;
        self
    }

    /// Enable or disable printing failed implicit flushes to stderr.
    ///
    /// Disabled by default.
    /// If enabled and tracing is not enabled, client will print errors to stderr.
    pub fn print_internal_error(mut self, print_internal_error: bool) -> Self {
        self.print_internal_error = print_internal_error;
        self
    }

    /// Build the client with the provided configuration.
    pub fn build(self) -> Result<Client> {
        let Config {
            api_key,
            hostname,
            file,
            flush_limit,
        } = self.config;

        if api_key.is_empty() {
            return Err(ClientBuilderError::MissingCredential);
        }
        let hostname = resolve_hostname(hostname, ::hostname::get)?;
        let flush_limit = match flush_limit {
            0 => DEFAULT_FLUSH_LIMIT,
            n => n,
        };
        let endpoint = endpoint::Endpoint::build(&self.base_url, &api_key, &hostname)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => imp::default_transport()
                .ok_or(ClientBuilderError::Missing("transport"))?
                .map_err(ClientBuilderError::Transport)?,
        };

        let inner = ClientInner {
            state: Mutex::new(State {
                payload: Payload::new(),
                endpoint,
                flush_error: None,
            }),
            size: AtomicUsize::new(0),
            flush_limit,
            file: file.unwrap_or_default().into(),
            transport,
            clock: self.clock,
            enable_trace: self.enable_trace,
            print_internal_error: self.print_internal_error,
        };

        Ok(Client {
            inner: Arc::new(inner),
        })
    }
}

/// Use the configured hostname, falling back once to the system one.
fn resolve_hostname(
    configured: Option<String>,
    system: impl FnOnce() -> io::Result<OsString>,
) -> Result<String> {
    if let Some(hostname) = configured.filter(|h| !h.is_empty()) {
        return Ok(hostname);
    }
    match system() {
        Ok(hostname) if !hostname.is_empty() => Ok(hostname.to_string_lossy().into_owned()),
        Ok(_) => Err(ClientBuilderError::MissingIdentity),
        Err(e) => {
            tracing::debug!(err = ?e, "failed to resolve system hostname");
            Err(ClientBuilderError::MissingIdentity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Response, TransportError};

    struct NullTransport;

    impl imp::Transport for NullTransport {
        fn post(&self, _: &str, _: &'static str, _: Vec<u8>) -> Result<Response, TransportError> {
            Ok(Response {
                status: 200,
                body: String::new(),
            })
        }
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = Client::builder()
            .hostname("h")
            .transport(NullTransport)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ClientBuilderError::MissingCredential));

        let err = Client::new(Config {
            api_key: String::new(),
            hostname: Some("h".into()),
            ..Config::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, ClientBuilderError::MissingCredential));
    }

    #[test]
    fn zero_flush_limit_uses_default() {
        let client = Client::builder()
            .api_key("key")
            .hostname("h")
            .transport(NullTransport)
            .build()
            .unwrap();
        assert_eq!(client.flush_limit(), DEFAULT_FLUSH_LIMIT);

        let client = Client::builder()
            .api_key("key")
            .hostname("h")
            .flush_limit(3)
            .transport(NullTransport)
            .build()
            .unwrap();
        assert_eq!(client.flush_limit(), 3);
    }

    #[test]
    fn invalid_base_url() {
        let err = Client::builder()
            .api_key("key")
            .hostname("h")
            .base_url("::not-a-url")
            .transport(NullTransport)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ClientBuilderError::InvalidAddress(_)));
    }

    #[test]
    fn configured_hostname_wins() {
        let hostname = resolve_hostname(Some("web-1".into()), || {
            panic!("system hostname must not be resolved")
        })
        .unwrap();
        assert_eq!(hostname, "web-1");
    }

    #[test]
    fn empty_hostname_falls_back_to_system() {
        let hostname = resolve_hostname(Some(String::new()), || Ok("box".into())).unwrap();
        assert_eq!(hostname, "box");
        let hostname = resolve_hostname(None, || Ok("box".into())).unwrap();
        assert_eq!(hostname, "box");
    }

    #[test]
    fn unresolvable_hostname() {
        let err = resolve_hostname(None, || Ok(OsString::new())).unwrap_err();
        assert!(matches!(err, ClientBuilderError::MissingIdentity));
        let err = resolve_hostname(None, || Err(io::Error::other("no uts"))).unwrap_err();
        assert!(matches!(err, ClientBuilderError::MissingIdentity));
    }

    #[test]
    fn config_roundtrips_through_builder() {
        let client = Client::new(Config {
            api_key: "key".into(),
            hostname: Some("h".into()),
            file: Some("app".into()),
            flush_limit: 10,
        });
        // the default transport depends on the enabled backend
        if cfg!(feature = "reqwest") {
            assert_eq!(client.unwrap().flush_limit(), 10);
        } else {
            assert!(matches!(
                client.err().unwrap(),
                ClientBuilderError::Missing("transport")
            ));
        }
    }
}
