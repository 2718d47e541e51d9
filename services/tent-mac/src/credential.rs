// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use tentapp_core::{utils::Redact, Error, Result, SigningCredential};

/// MAC algorithm used to digest the canonical request string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// `hmac-sha-256`, the default.
    #[default]
    HmacSha256,
    /// `hmac-sha-1`.
    HmacSha1,
}

impl FromStr for MacAlgorithm {
    type Err = Error;

    /// Accepts `sha256`, `hmac-sha-256`, `hmac-sha256` and their sha1
    /// counterparts, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "hmac-sha-256" | "hmac-sha256" => Ok(MacAlgorithm::HmacSha256),
            "sha1" | "hmac-sha-1" | "hmac-sha1" => Ok(MacAlgorithm::HmacSha1),
            v => Err(Error::signing_failed(format!(
                "mac algorithm {v} is not supported"
            ))),
        }
    }
}

impl Display for MacAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MacAlgorithm::HmacSha256 => f.write_str("hmac-sha-256"),
            MacAlgorithm::HmacSha1 => f.write_str("hmac-sha-1"),
        }
    }
}

/// Credential issued to an app for MAC Access Authentication.
#[derive(Clone)]
pub struct Credential {
    /// MAC key identifier, sent in the clear as `id`.
    pub key_id: String,
    /// Shared secret the request mac is computed with.
    pub key: String,
    /// Digest algorithm, `hmac-sha-256` unless the server said otherwise.
    pub algorithm: MacAlgorithm,
}

impl Credential {
    /// Create a new credential using `hmac-sha-256`.
    pub fn new(key_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key: key.into(),
            algorithm: MacAlgorithm::default(),
        }
    }

    /// Set the algorithm.
    pub fn with_algorithm(mut self, algorithm: MacAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build a credential from raw values, as handed out by a Tent server.
    ///
    /// `algorithm` defaults to `sha256` when absent; an unknown name fails
    /// with `SigningFailed`.
    pub fn from_parts(key_id: &str, key: &str, algorithm: Option<&str>) -> Result<Self> {
        let algorithm = match algorithm {
            Some(v) => v.parse()?,
            None => MacAlgorithm::default(),
        };
        Ok(Self::new(key_id, key).with_algorithm(algorithm))
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key_id", &Redact::from(&self.key_id))
            .field("key", &Redact::from(&self.key))
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.key_id.is_empty() && !self.key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tentapp_core::ErrorKind;
    use test_case::test_case;

    #[test_case("sha256", MacAlgorithm::HmacSha256; "short sha256")]
    #[test_case("hmac-sha-256", MacAlgorithm::HmacSha256; "draft sha256")]
    #[test_case("HMAC-SHA256", MacAlgorithm::HmacSha256; "upper sha256")]
    #[test_case("sha1", MacAlgorithm::HmacSha1; "short sha1")]
    #[test_case("hmac-sha-1", MacAlgorithm::HmacSha1; "draft sha1")]
    fn test_parse_algorithm(input: &str, expected: MacAlgorithm) {
        assert_eq!(input.parse::<MacAlgorithm>().unwrap(), expected);
    }

    #[test]
    fn test_unsupported_algorithm() {
        let err = "md5".parse::<MacAlgorithm>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningFailed);
    }

    #[test]
    fn test_from_parts_defaults_to_sha256() -> Result<()> {
        let cred = Credential::from_parts("k", "s", None)?;
        assert_eq!(cred.algorithm, MacAlgorithm::HmacSha256);
        assert!(cred.is_valid());

        let cred = Credential::from_parts("k", "s", Some("hmac-sha-1"))?;
        assert_eq!(cred.algorithm, MacAlgorithm::HmacSha1);
        Ok(())
    }

    #[test]
    fn test_credential_validity() {
        assert!(!Credential::new("", "s").is_valid());
        assert!(!Credential::new("k", "").is_valid());
    }

    #[test]
    fn test_debug_redacts_key() {
        let cred = Credential::new("u:d1a2b3", "bcb2a5f9e07a7c13f7eec70");
        let s = format!("{cred:?}");
        assert!(!s.contains("bcb2a5f9e07a7c13f7eec70"));
        assert!(s.contains("bcb***c70"));
    }
}
