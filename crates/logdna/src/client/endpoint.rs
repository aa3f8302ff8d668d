use crate::time::unix_millis;
use jiff::Timestamp;
use url::Url;

/// Base address of the LogDNA ingest API.
pub const INGEST_BASE_URL: &str = "https://logs.logdna.com/logs/ingest";

const HOSTNAME: &str = "hostname";
const NOW: &str = "now";

/// Endpoint construction error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EndpointError {
    /// The base address could not be parsed.
    #[error("invalid base address: {0}")]
    Parse(#[from] url::ParseError),
    /// The base address cannot carry a credential in its user-info component.
    #[error("base address cannot carry a credential")]
    Credential,
}

/// Request target for the ingest API.
///
/// The credential travels as the user-info component of the URL and the origin identity as the
/// `hostname` query parameter. Both are fixed at construction. Only `now` changes afterwards.
#[derive(Debug, Clone)]
pub struct Endpoint {
    url: Url,
    hostname: String,
}

impl Endpoint {
    /// Build the endpoint from a base address, a credential and an origin identity.
    pub fn build(base: &str, credential: &str, hostname: &str) -> Result<Self, EndpointError> {
        let mut url = Url::parse(base)?;
        url.set_username(credential)
            .map_err(|_| EndpointError::Credential)?;
        url.query_pairs_mut().append_pair(HOSTNAME, hostname);

        Ok(Endpoint {
            url,
            hostname: hostname.to_string(),
        })
    }

    /// The origin identity sent as `hostname`.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Stamp the endpoint with the current wall-clock time and return the serialized URL.
    pub fn refresh(&mut self) -> String {
        self.refresh_at(Timestamp::now())
    }

    /// Stamp the endpoint with `now` and return the serialized URL.
    ///
    /// Any previous `now` parameter is replaced; every other component is left as is.
    pub fn refresh_at(&mut self, now: Timestamp) -> String {
        let retained: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != NOW)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut query = self.url.query_pairs_mut();
            query.clear();
            for (key, value) in &retained {
                query.append_pair(key, value);
            }
            query.append_pair(NOW, &unix_millis(now).to_string());
        }

        self.url.to_string()
    }
}
