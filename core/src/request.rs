use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
///
/// The query is kept exactly as it appeared in the url: MAC signatures cover
/// the raw request-uri, so no decoding or reordering may happen here.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// Raw HTTP query, without the leading `?`.
    pub query: Option<String>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri);
        let mut ctx = Self::from_uri(parts.method.clone(), uri)?;

        // Take the headers out of the request to avoid copy.
        // We will return it back when apply the context.
        ctx.headers = mem::take(&mut parts.headers);
        Ok(ctx)
    }

    /// Build a signing context from a method and an absolute uri.
    ///
    /// Fails with [`ErrorKind::MalformedTarget`](crate::ErrorKind::MalformedTarget)
    /// if the uri has no scheme or no host.
    pub fn from_uri(method: Method, uri: Uri) -> Result<Self> {
        let uri_str = uri.to_string();
        let uri = uri.into_parts();

        let scheme = uri.scheme.ok_or_else(|| {
            Error::malformed_target(format!("request target {uri_str} has no scheme"))
        })?;
        let authority = uri
            .authority
            .filter(|v| !v.host().is_empty())
            .ok_or_else(|| {
                Error::malformed_target(format!("request target {uri_str} has no host"))
            })?;
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method,
            scheme,
            authority,
            path: match paq.path() {
                "" => "/".to_string(),
                v => v.to_string(),
            },
            query: paq.query().map(|v| v.to_string()),
            headers: HeaderMap::new(),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let paq = self.path_and_query();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Path followed by `?query` when the query is present and non-empty.
    pub fn path_and_query(&self) -> String {
        match self.query.as_deref() {
            Some(q) if !q.is_empty() => format!("{}?{}", self.path, q),
            _ => self.path.clone(),
        }
    }

    /// Host as presented in the url.
    #[inline]
    pub fn host(&self) -> &str {
        self.authority.host()
    }

    /// Explicit port of the url, or the default port of its scheme:
    /// `443` for https and `80` for everything else.
    pub fn port(&self) -> u16 {
        match self.authority.port_u16() {
            Some(port) => port,
            None if self.scheme == Scheme::HTTPS => 443,
            None => 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(url: &str) -> Result<SigningRequest> {
        SigningRequest::from_uri(Method::GET, Uri::from_str(url)?)
    }

    #[test]
    fn test_from_uri_keeps_raw_query() -> Result<()> {
        let req = parse("https://api.example.test/posts?since_id=a%20b&limit=5")?;
        assert_eq!(req.path, "/posts");
        assert_eq!(req.query.as_deref(), Some("since_id=a%20b&limit=5"));
        assert_eq!(req.path_and_query(), "/posts?since_id=a%20b&limit=5");
        Ok(())
    }

    #[test]
    fn test_empty_query_has_no_question_mark() -> Result<()> {
        let req = parse("https://api.example.test/posts?")?;
        assert_eq!(req.path_and_query(), "/posts");
        Ok(())
    }

    #[test]
    fn test_port_defaults() -> Result<()> {
        assert_eq!(parse("https://example.test/")?.port(), 443);
        assert_eq!(parse("http://example.test/")?.port(), 80);
        assert_eq!(parse("https://example.test:8443/")?.port(), 8443);
        assert_eq!(parse("http://example.test:443/")?.port(), 443);
        Ok(())
    }

    #[test]
    fn test_missing_host_is_malformed() {
        let err = parse("/posts").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedTarget);
    }

    #[test]
    fn test_build_and_apply() -> Result<()> {
        let req = http::Request::get("https://api.example.test/posts?limit=1")
            .header("accept", "application/vnd.tent.v0+json")
            .body(())?;
        let (mut parts, _) = req.into_parts();

        let ctx = SigningRequest::build(&mut parts)?;
        assert!(parts.headers.is_empty());
        assert_eq!(ctx.headers.len(), 1);

        ctx.apply(&mut parts)?;
        assert_eq!(
            parts.uri.to_string(),
            "https://api.example.test/posts?limit=1"
        );
        assert_eq!(parts.headers.len(), 1);
        Ok(())
    }
}
