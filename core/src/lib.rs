//! Core components for discovering Tent entities and signing their requests.
//!
//! This crate provides the foundational types and traits shared by the
//! tentapp crates.
//!
//! ## Overview
//!
//! - **Context**: holds the collaborators used at runtime, an [`HttpSend`]
//!   transport and an [`Env`] to read configuration from.
//! - **Traits**: [`ProvideCredential`] loads credentials and [`SignRequest`]
//!   signs an `http::request::Parts` in place.
//! - **Signer**: binds a [`SignRequest`] implementation to a credential that
//!   can be set exactly once.
//!
//! ## Example
//!
//! ```no_run
//! use tentapp_core::{Context, Result, SignRequest, Signer, SigningCredential};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut http::request::Parts,
//!         cred: Option<&Self::Credential>,
//!     ) -> Result<()> {
//!         let cred = cred.expect("signer always passes the credential");
//!         req.headers.insert("x-key", cred.key.parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), MySigner);
//! signer.set_credential(MyCredential { key: "secret".to_string() })?;
//!
//! let mut parts = http::Request::get("https://example.test/")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC and base64 helpers
//! - [`time`]: clock access
//! - [`utils`]: data redaction for `Debug` output

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, RequestTimeout, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
