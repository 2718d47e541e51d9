use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use tentapp_core::{Error, RequestTimeout, Result};

/// Media type Tent servers answer with.
pub const TENT_MEDIA_TYPE: &str = "application/vnd.tent.v0+json";

/// Config carries the settings shared by discovery and every API call.
///
/// It replaces process wide default headers: each client owns its own copy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Headers sent with every request, `Accept: application/vnd.tent.v0+json`
    /// by default.
    pub headers: HeaderMap,
    /// Per-request timeout handed to the transport. `None` leaves the
    /// transport's own policy in place.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(TENT_MEDIA_TYPE));

        Self {
            headers,
            timeout: None,
        }
    }
}

impl Config {
    /// Create a new Config with the default headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `Accept` header.
    pub fn with_accept(self, accept: &str) -> Result<Self> {
        self.with_header(ACCEPT.as_str(), accept)
    }

    /// Set a default header, replacing any previous value. An empty value
    /// removes the header from every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Prepare the headers of a request to `uri`.
    ///
    /// Starts from the default headers, adds `Host` derived from `uri`, then
    /// applies `overrides`. Headers left with an empty value are dropped.
    pub fn prepare_headers(&self, uri: &Uri, overrides: &HeaderMap) -> Result<HeaderMap> {
        let mut headers = self.headers.clone();

        if let Some(host) = uri.host() {
            let host = match uri.port_u16() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            headers.insert(HOST, HeaderValue::from_str(&host)?);
        }

        for name in overrides.keys() {
            headers.remove(name);
            for value in overrides.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        let mut prepared = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers.iter() {
            if !value.is_empty() {
                prepared.append(name.clone(), value.clone());
            }
        }
        Ok(prepared)
    }

    /// Build a body-less request carrying the prepared headers and the
    /// configured timeout.
    pub(crate) fn build_request(
        &self,
        method: Method,
        uri: Uri,
        overrides: &HeaderMap,
    ) -> Result<http::Request<Bytes>> {
        let headers = self.prepare_headers(&uri, overrides)?;

        let mut req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .map_err(|e| Error::malformed_target("failed to build request").with_source(e))?;
        *req.headers_mut() = headers;
        if let Some(timeout) = self.timeout {
            req.extensions_mut().insert(RequestTimeout(timeout));
        }

        Ok(req)
    }
}
