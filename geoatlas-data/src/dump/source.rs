use std::{
    io::{self, Write},
    time::Duration,
};

use reqwest::blocking::{Client, Response};
use reqwest::header::USER_AGENT;

use super::util::{file_url, sanitise_base_url};
use super::{BaseUrl, TransportError};

pub const DEFAULT_USER_AGENT: &str = "geoatlas/0.1";
pub const DEFAULT_BASE_URL: &str = "https://download.geonames.org/export/dump";

/// A server publishing dump files by name.
pub trait DumpSource {
    /// Base URL of the dump endpoint.
    fn base_url(&self) -> &BaseUrl;
    /// Stream the file called `file_name` into `sink`, returning the byte count.
    fn download(&self, file_name: &str, sink: &mut dyn Write) -> Result<u64, TransportError>;
}

/// HTTP implementation of [`DumpSource`].
///
/// Requests block until the transfer completes; only establishing the
/// connection is bounded by a timeout.
#[derive(Debug)]
pub struct HttpDumpSource {
    client: Client,
    base_url: BaseUrl,
    user_agent: String,
}

impl HttpDumpSource {
    /// Construct an HTTP-backed dump source.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()
            .map_err(|source| TransportError::Client { source })?;
        Ok(Self {
            client,
            base_url: sanitise_base_url(base_url),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    /// Override the default user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn call(&self, url: &str) -> Result<Response, TransportError> {
        self.client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|err| convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, url))
    }
}

impl DumpSource for HttpDumpSource {
    fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    fn download(&self, file_name: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let url = file_url(&self.base_url, file_name)?;
        let mut response = self.call(url.as_ref())?;
        io::copy(&mut response, sink).map_err(|source| TransportError::Network {
            url: url.to_string(),
            source,
        })
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    TransportError::Network {
        url: url.to_owned(),
        source: io::Error::new(kind, error),
    }
}
