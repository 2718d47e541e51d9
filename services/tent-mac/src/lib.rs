//! MAC Access Authentication for Tent apps.
//!
//! Signs requests with a shared MAC key the way
//! [draft-ietf-oauth-v2-http-mac-01](https://tools.ietf.org/html/draft-ietf-oauth-v2-http-mac-01)
//! describes: a timestamp, a random nonce and an HMAC over the canonical
//! request string, sent as
//!
//! ```text
//! Authorization: MAC id="<key id>", ts="<ts>", nonce="<nonce>", mac="<mac>"
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tentapp_core::{Context, Result, Signer};
//! use tentapp_mac::{Credential, RequestSigner};
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), RequestSigner::new());
//! signer.set_credential(Credential::new("key_id", "key"))?;
//!
//! let mut parts = http::Request::get("https://api.example.test/posts")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{NONCE_LENGTH, TENT_MAC_ALGORITHM, TENT_MAC_KEY, TENT_MAC_KEY_ID};

mod config;
pub use config::Config;

mod credential;
pub use credential::{Credential, MacAlgorithm};

mod sign_request;
pub use sign_request::{
    authorization_header, canonical_request_string, canonical_string, compute_mac,
    generate_nonce, RequestSigner,
};

mod provide_credential;
pub use provide_credential::*;
