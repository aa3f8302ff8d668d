use super::{Response, Transport, TransportError};
use crate::client::headers;
use reqwest::blocking;

type Result<T, E = TransportError> = std::result::Result<T, E>;

/// [`Transport`] backed by a blocking [`reqwest`] client.
///
/// User-info in the request URL is sent as HTTP basic auth.
#[derive(Clone)]
pub(crate) struct HttpClient {
    inner: blocking::Client,
}

impl HttpClient {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            inner: blocking::ClientBuilder::new()
                .user_agent(headers::USER_AGENT_VALUE)
                .build()?,
        })
    }
}

impl Transport for HttpClient {
    fn post(&self, url: &str, content_type: &'static str, body: Vec<u8>) -> Result<Response> {
        let res = self
            .inner
            .post(url)
            .header(headers::CONTENT_TYPE, content_type)
            .body(body)
            .send()?;
        let status = res.status().as_u16();
        // a body we cannot read must not mask the status
        let body = res.text().unwrap_or_default();
        Ok(Response { status, body })
    }
}
