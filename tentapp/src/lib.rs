//! Discover Tent entities and call their API with MAC Access Authentication.
//!
//! ## Example
//!
//! ```no_run
//! use tentapp::mac::Credential;
//! use tentapp::{default_context, Client, Config};
//!
//! # async fn example() -> tentapp::Result<()> {
//! let client = Client::discover(default_context(), Config::new(), "https://example.test/").await?;
//! println!("{} is served by {:?}", client.entity(), client.servers());
//!
//! client.authenticate(Credential::new("u:d1a2b3", "secret"))?;
//! let posts = client.get_posts(None).await?;
//! println!("{posts}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - `tentapp_core`: context, error and signer plumbing, re-exported here.
//! - [`mac`]: MAC Access Authentication credentials and request signer.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use tentapp_core::*;

/// MAC Access Authentication signing.
pub mod mac {
    pub use tentapp_mac::*;
}

mod config;
pub use config::{Config, TENT_MEDIA_TYPE};

pub mod discovery;
pub use discovery::{discover, ResolvedEntity};

mod client;
pub use client::Client;

#[cfg(all(feature = "default-context", not(target_arch = "wasm32")))]
mod context;
#[cfg(all(feature = "default-context", not(target_arch = "wasm32")))]
pub use context::{default_context, with_client};
