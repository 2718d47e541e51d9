use crate::{constants::*, Credential};
use async_trait::async_trait;
use tentapp_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads MAC credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `TENT_MAC_KEY_ID`: The MAC key identifier
/// - `TENT_MAC_KEY`: The MAC key
/// - `TENT_MAC_ALGORITHM`: The MAC algorithm (optional, `hmac-sha-256` by default)
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(TENT_MAC_KEY_ID), envs.get(TENT_MAC_KEY)) {
            (Some(key_id), Some(key)) => Credential::from_parts(
                key_id,
                key,
                envs.get(TENT_MAC_ALGORITHM).map(String::as_str),
            )
            .map(Some),
            _ => Ok(None),
        }
    }
}
