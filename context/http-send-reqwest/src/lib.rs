//! [`HttpSend`] implementation backed by [`reqwest`].

use async_trait::async_trait;
use bytes::Bytes;
use http::header::HOST;
use http_body_util::BodyExt;
use reqwest::{Client, Request};
use tentapp_core::{Error, HttpSend, RequestTimeout, Result};

/// ReqwestHttpSend sends requests through a [`reqwest::Client`].
///
/// Redirects, TLS and connection pooling follow the client's configuration.
/// A [`RequestTimeout`] extension on the request overrides the client's
/// timeout for that request only.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, mut req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let timeout = req.extensions().get::<RequestTimeout>().copied();
        drop_derived_host(&mut req);

        let mut req = Request::try_from(req)
            .map_err(|e| Error::malformed_target("request can't be sent").with_source(e))?;
        if let Some(RequestTimeout(d)) = timeout {
            *req.timeout_mut() = Some(d);
        }

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send http request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

/// Remove a `Host` header that only repeats the uri's host and port.
///
/// reqwest keeps explicit headers across redirects, so a derived `Host` would
/// be sent to every following hop. Without it, the client sets the right one
/// per hop.
fn drop_derived_host(req: &mut http::Request<Bytes>) {
    let Some(host) = req.uri().host() else {
        return;
    };
    let derived = match req.uri().port_u16() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let is_derived = req
        .headers()
        .get(HOST)
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(derived.as_bytes()));
    if is_derived {
        req.headers_mut().remove(HOST);
    }
}
