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

//! Hash related utils.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

fn hmac_bytes<M: Mac + KeyInit>(key: &[u8], content: &[u8]) -> Vec<u8> {
    // HMAC pads or hashes the key, so every length is accepted.
    let mut m = <M as KeyInit>::new_from_slice(key).unwrap();
    m.update(content);
    m.finalize().into_bytes().to_vec()
}

/// HMAC-SHA256 of `content`.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> Vec<u8> {
    hmac_bytes::<Hmac<Sha256>>(key, content)
}

/// HMAC-SHA256 of `content`, base64 encoded.
pub fn base64_hmac_sha256(key: &[u8], content: &[u8]) -> String {
    base64_encode(&hmac_sha256(key, content))
}

/// HMAC-SHA1 of `content`, base64 encoded.
///
/// Only for servers that still hand out `hmac-sha-1` keys.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
    base64_encode(&hmac_bytes::<Hmac<Sha1>>(key, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // RFC 4231 test case 2 and RFC 2202 test case 2.
    #[test]
    fn test_hmac_known_vectors() {
        let key = b"Jefe";
        let data = b"what do ya want for nothing?";

        assert_eq!(
            base64_encode(&hmac_sha256(key, data)),
            base64_hmac_sha256(key, data)
        );
        assert_eq!(
            base64_hmac_sha256(key, data),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM="
        );
        assert_eq!(base64_hmac_sha1(key, data), "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }
}
