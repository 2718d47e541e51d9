use async_trait::async_trait;
use std::sync::Arc;
use tentapp_core::{Context, ProvideCredential, Result};

use crate::config::Config;
use crate::credential::Credential;

/// ConfigCredentialProvider will load credential from config, filling the
/// gaps from the environment.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new provider via config.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);

        if let (Some(key_id), Some(key)) = (&config.key_id, &config.key) {
            let cred = Credential::from_parts(key_id, key, config.algorithm.as_deref())?;
            return Ok(Some(cred));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use std::collections::HashMap;
    use tentapp_core::StaticEnv;

    #[tokio::test]
    async fn test_config_credential_provider() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(TENT_MAC_KEY.to_string(), "env_key".to_string())]),
        });
        let config = Arc::new(Config::new().with_key_id("config_key_id"));

        let cred = ConfigCredentialProvider::new(config)
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.key_id, "config_key_id");
        assert_eq!(cred.key, "env_key");
        Ok(())
    }

    #[tokio::test]
    async fn test_config_credential_provider_incomplete() -> Result<()> {
        let config = Arc::new(Config::new().with_key_id("config_key_id"));

        let cred = ConfigCredentialProvider::new(config)
            .provide_credential(&Context::new())
            .await?;
        assert!(cred.is_none());
        Ok(())
    }
}
