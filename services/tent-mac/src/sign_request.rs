//! MAC Access Authentication request signer.
use std::fmt::Write;
use std::str::FromStr;

use http::header::AUTHORIZATION;
use http::HeaderValue;
use http::Method;
use http::Uri;
use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;
use tentapp_core::hash::{base64_hmac_sha1, base64_hmac_sha256};
use tentapp_core::time::{self, now, DateTime};
use tentapp_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::constants::*;
use crate::credential::{Credential, MacAlgorithm};

/// RequestSigner that implements MAC Access Authentication.
///
/// Every request gets a fresh timestamp and nonce, so a signed request can
/// only be replayed within the server's accepted clock window and never
/// with the same nonce.
///
/// - [HTTP Authentication: MAC Access Authentication](https://tools.ietf.org/html/draft-ietf-oauth-v2-http-mac-01)
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the nonce.
    ///
    /// # Note
    ///
    /// Reusing a nonce defeats replay protection.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_nonce(mut self, nonce: &str) -> Self {
        self.nonce = Some(nonce.to_string());
        self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        parts: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred =
            credential.ok_or_else(|| Error::credential_incomplete("missing credential"))?;
        if cred.key_id.is_empty() || cred.key.is_empty() {
            return Err(Error::signing_failed(
                "mac key id and mac key must not be empty",
            ));
        }

        let ts = time::timestamp(self.time.unwrap_or_else(now));
        let nonce = match &self.nonce {
            Some(v) => v.clone(),
            None => generate_nonce()?,
        };

        let mut ctx = SigningRequest::build(parts)?;

        let string_to_sign = canonical_string(ts, &nonce, &ctx);
        debug!("canonical request string: {string_to_sign:?}");
        let mac = compute_mac(cred.algorithm, cred.key.as_bytes(), &string_to_sign);

        ctx.headers.insert(AUTHORIZATION, {
            let mut value =
                HeaderValue::from_str(&authorization_header(&cred.key_id, ts, &nonce, &mac))
                    .map_err(|e| {
                        Error::signing_failed("mac key id can't be sent in a header")
                            .with_source(e)
                    })?;
            value.set_sensitive(true);

            value
        });

        ctx.apply(parts)
    }
}

/// Construct the canonical request string for a target url.
///
/// ## Format
///
/// ```text
/// timestamp + "\n" +
/// nonce + "\n" +
/// METHOD + "\n" +
/// path [ "?" query ] + "\n" +
/// host + "\n" +
/// port + "\n" +
/// ext + "\n"
/// ```
///
/// `ext` is always empty, so the string ends with `"\n\n"`. The port is the
/// explicit one when present, otherwise `443` for https and `80` for the
/// rest. The host is taken as presented, no normalization happens.
///
/// Fails with `MalformedTarget` when `url` has no scheme or host.
pub fn canonical_request_string(ts: i64, nonce: &str, method: &str, url: &str) -> Result<String> {
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|e| Error::malformed_target(format!("invalid method {method}")).with_source(e))?;
    let req = SigningRequest::from_uri(method, Uri::from_str(url)?)?;

    Ok(canonical_string(ts, nonce, &req))
}

/// Construct the canonical request string from a parsed request.
pub fn canonical_string(ts: i64, nonce: &str, req: &SigningRequest) -> String {
    let mut s = String::with_capacity(128);

    // Writing into a String can't fail.
    let _ = writeln!(s, "{ts}");
    let _ = writeln!(s, "{nonce}");
    let _ = writeln!(s, "{}", req.method.as_str().to_ascii_uppercase());
    let _ = writeln!(s, "{}", req.path_and_query());
    let _ = writeln!(s, "{}", req.host());
    let _ = writeln!(s, "{}", req.port());
    // ext
    s.push('\n');

    s
}

/// Base64 encoded mac of the canonical request string.
pub fn compute_mac(algorithm: MacAlgorithm, key: &[u8], string_to_sign: &str) -> String {
    match algorithm {
        MacAlgorithm::HmacSha256 => base64_hmac_sha256(key, string_to_sign.as_bytes()),
        MacAlgorithm::HmacSha1 => base64_hmac_sha1(key, string_to_sign.as_bytes()),
    }
}

/// Render the `Authorization` header value.
///
/// ```text
/// MAC id="<key id>", ts="<ts>", nonce="<nonce>", mac="<mac>"
/// ```
pub fn authorization_header(key_id: &str, ts: i64, nonce: &str, mac: &str) -> String {
    format!(r#"{MAC_SCHEME} id="{key_id}", ts="{ts}", nonce="{nonce}", mac="{mac}""#)
}

/// Generate a hex encoded nonce from the operating system's random source.
///
/// There is no fallback: if the OS can't provide randomness, signing fails.
pub fn generate_nonce() -> Result<String> {
    let mut bs = [0u8; NONCE_LENGTH];
    OsRng.try_fill_bytes(&mut bs).map_err(|e| {
        Error::signing_failed("secure random source is unavailable").with_source(e)
    })?;

    Ok(hex::encode(bs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tentapp_core::{ErrorKind, Signer};
    use test_case::test_case;

    #[test]
    fn test_canonical_request_string() -> Result<()> {
        let s = canonical_request_string(
            1336363200,
            "dj83hs9s",
            "get",
            "http://example.com/resource/1?b=1&a=2",
        )?;

        assert_eq!(
            s,
            "1336363200\ndj83hs9s\nGET\n/resource/1?b=1&a=2\nexample.com\n80\n\n"
        );
        assert_eq!(s.lines().count(), 7);
        Ok(())
    }

    #[test_case("https://example.test/posts", "443"; "https default")]
    #[test_case("http://example.test/posts", "80"; "http default")]
    #[test_case("https://example.test:8443/posts", "8443"; "explicit https")]
    #[test_case("http://example.test:3000/posts", "3000"; "explicit http")]
    fn test_port_field(url: &str, port: &str) {
        let s = canonical_request_string(1, "n", "GET", url).unwrap();
        assert_eq!(s.lines().nth(5), Some(port));
    }

    #[test_case("https://example.test/posts", "/posts"; "no query")]
    #[test_case("https://example.test/posts?", "/posts"; "empty query")]
    #[test_case("https://example.test/posts?limit=2", "/posts?limit=2"; "query")]
    #[test_case("https://example.test", "/"; "no path")]
    fn test_path_field(url: &str, path: &str) {
        let s = canonical_request_string(1, "n", "GET", url).unwrap();
        assert_eq!(s.lines().nth(3), Some(path));
    }

    #[test]
    fn test_host_is_not_normalized() {
        let s = canonical_request_string(1, "n", "GET", "https://Example.TEST/").unwrap();
        assert_eq!(s.lines().nth(4), Some("Example.TEST"));
    }

    #[test_case("/posts"; "relative")]
    #[test_case("example.test:80"; "authority only")]
    #[test_case("not a url"; "garbage")]
    fn test_malformed_target(url: &str) {
        let err = canonical_request_string(1, "n", "GET", url).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedTarget);
    }

    #[test]
    fn test_compute_mac_known_values() {
        let s = "1336363200\ndj83hs9s\nGET\n/resource/1?b=1&a=2\nexample.com\n80\n\n";
        assert_eq!(
            compute_mac(MacAlgorithm::HmacSha1, b"489dks293j39", s),
            "6T3zZzy2Emppni6bzL7kdRxUWL4="
        );
        assert_eq!(
            compute_mac(MacAlgorithm::HmacSha256, b"489dks293j39", s),
            "1c0l2YIW7g7syyDmVHy2lxCeZK5VouDCuU0T0YOmTOU="
        );
    }

    #[test]
    fn test_authorization_header_is_cleanly_closed() {
        let v = authorization_header("k", 1, "abc", "xyz=");
        assert_eq!(v, r#"MAC id="k", ts="1", nonce="abc", mac="xyz=""#);
        assert!(v.ends_with('"'));
    }

    #[test]
    fn test_generate_nonce() -> Result<()> {
        let a = generate_nonce()?;
        let b = generate_nonce()?;
        assert_eq!(a.len(), NONCE_LENGTH * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        Ok(())
    }

    #[tokio::test]
    async fn test_sign() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let builder = RequestSigner::new()
            .with_time(time::from_timestamp(1355000000).expect("valid time"))
            .with_nonce("0a1b2c3d4e5f6a7b");
        let signer = Signer::new(Context::new(), builder);
        signer.set_credential(Credential::new("k", "s"))?;

        let req = http::Request::get("https://api.example.test/posts").body(())?;
        let (mut parts, _) = req.into_parts();
        signer.sign(&mut parts).await?;

        let auth = parts.headers.get(AUTHORIZATION).expect("must be signed");
        assert!(auth.is_sensitive());
        assert_eq!(
            auth.to_str().expect("ascii header"),
            r#"MAC id="k", ts="1355000000", nonce="0a1b2c3d4e5f6a7b", mac="k8SN7Uk++jyeum8snOym6kuNtpADIqv35G5XILu3RJs=""#
        );
        assert_eq!(parts.uri.to_string(), "https://api.example.test/posts");
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_twice_uses_fresh_nonce() -> Result<()> {
        let signer = Signer::new(Context::new(), RequestSigner::new());
        signer.set_credential(Credential::new("k", "s"))?;

        let mut headers = Vec::new();
        for _ in 0..2 {
            let (mut parts, _) = http::Request::get("https://api.example.test/posts")
                .body(())?
                .into_parts();
            signer.sign(&mut parts).await?;
            headers.push(parts.headers[AUTHORIZATION].clone());
        }

        assert_ne!(headers[0], headers[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_rejects_empty_key() {
        let (mut parts, _) = http::Request::get("https://api.example.test/posts")
            .body(())
            .unwrap()
            .into_parts();

        let err = RequestSigner::new()
            .sign_request(&Context::new(), &mut parts, Some(&Credential::new("k", "")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningFailed);
    }
}
