use async_trait::async_trait;
use std::sync::Arc;
use tentapp_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

use crate::config::Config;
use crate::credential::Credential;
use crate::provide_credential::{ConfigCredentialProvider, EnvCredentialProvider};

/// DefaultCredentialProvider will try to load credential from different sources.
///
/// Resolution order:
///
/// 1. Config (when created with [`DefaultCredentialProvider::with_config`])
/// 2. Environment variables
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new().push(EnvCredentialProvider::new());

        Self { chain }
    }

    /// Create a provider that checks `config` before the environment.
    pub fn with_config(config: Arc<Config>) -> Self {
        Self::new().push_front(ConfigCredentialProvider::new(config))
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tentapp_mac::{DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// let provider = DefaultCredentialProvider::new()
    ///     .push_front(StaticCredentialProvider::new("key_id", "key"));
    /// ```
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        self.chain = self.chain.push_front(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use std::collections::HashMap;
    use tentapp_core::StaticEnv;

    #[tokio::test]
    async fn test_default_provider_without_env() -> Result<()> {
        let cred = DefaultCredentialProvider::new()
            .provide_credential(&Context::new())
            .await?;
        assert!(cred.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_default_provider_prefers_config() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (TENT_MAC_KEY_ID.to_string(), "env_key_id".to_string()),
                (TENT_MAC_KEY.to_string(), "env_key".to_string()),
            ]),
        });
        let config = Config::new()
            .with_key_id("config_key_id")
            .with_key("config_key");

        let cred = DefaultCredentialProvider::with_config(Arc::new(config))
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.key_id, "config_key_id");
        assert_eq!(cred.key, "config_key");
        Ok(())
    }
}
