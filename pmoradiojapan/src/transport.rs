//! Blocking HTTP transport shared by the radiko and NHK clients
//!
//! Every request goes through a single [`ureq::Agent`] configured with
//! `http_status_as_error(false)`, so non-2xx responses come back as data and
//! the caller decides what a status means. Decoding helpers turn bodies into
//! typed values and report failures with [`Error::Parse`].

use crate::error::{BodyFormat, Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use ureq::Agent;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Browser-like user agent; radiko answers differently to unknown agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Network settings handed explicitly to every client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Status, headers and body of a completed exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Header names are lowercase
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8; invalid bytes are a [`BodyFormat::Text`] parse error
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| {
            Error::parse(BodyFormat::Text, &String::from_utf8_lossy(&self.body), e)
        })
    }
}

/// HTTP transport
#[derive(Clone)]
pub struct Transport {
    agent: Agent,
    settings: HttpSettings,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("settings", &self.settings)
            .finish()
    }
}

impl Transport {
    pub fn new(settings: HttpSettings) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(settings.timeout))
            .build();
        let agent: Agent = config.into();

        Self { agent, settings }
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    /// Performs one request and returns whatever the server answered
    ///
    /// `params` are sent as the query string for GET and as a form body for
    /// POST. Only transport failures are errors here.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<RawResponse> {
        debug!("{:?} {}", method, url);

        let result = match method {
            Method::Get => {
                let mut request = self
                    .agent
                    .get(url)
                    .header("User-Agent", self.settings.user_agent.as_str());
                for (name, value) in headers {
                    request = request.header(*name, *value);
                }
                request.query_pairs(params.iter().copied()).call()
            }
            Method::Post => {
                let mut request = self
                    .agent
                    .post(url)
                    .header("User-Agent", self.settings.user_agent.as_str());
                for (name, value) in headers {
                    request = request.header(*name, *value);
                }
                if params.is_empty() {
                    request.send_empty()
                } else {
                    request.send_form(params.iter().copied())
                }
            }
        };

        let mut response = result.map_err(|e| Error::network(url, e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| Error::network(url, e))?;

        trace!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// GET returning the body of a 2xx response
    pub fn fetch_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<String> {
        let response = self.request(Method::Get, url, params, headers)?;
        if !response.is_success() {
            debug!("{} returned HTTP {}", url, response.status);
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        let body = response.text()?;
        Ok(body.to_string())
    }

    pub fn fetch_xml<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        let body = self.fetch_text(url, params, &[])?;
        decode_xml(&body)
    }

    pub fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.fetch_text(url, params, &[])?;
        decode_json(&body)
    }
}

/// Decodes an XML document with quick-xml's serde support
pub fn decode_xml<T: DeserializeOwned>(body: &str) -> Result<T> {
    quick_xml::de::from_str(body).map_err(|e| Error::parse(BodyFormat::Xml, body, e))
}

/// Decodes a JSON document
pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::parse(BodyFormat::Json, body, e))
}
