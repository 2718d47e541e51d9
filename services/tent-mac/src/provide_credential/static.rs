use async_trait::async_trait;
use tentapp_core::{Context, ProvideCredential, Result};

use crate::credential::{Credential, MacAlgorithm};

/// StaticCredentialProvider hands out a fixed MAC credential.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider using `hmac-sha-256`.
    pub fn new(key_id: &str, key: &str) -> Self {
        Self {
            credential: Credential::new(key_id, key),
        }
    }

    /// Set the algorithm.
    pub fn with_algorithm(mut self, algorithm: MacAlgorithm) -> Self {
        self.credential.algorithm = algorithm;
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() -> Result<()> {
        let provider =
            StaticCredentialProvider::new("k", "s").with_algorithm(MacAlgorithm::HmacSha1);

        let cred = provider
            .provide_credential(&Context::new())
            .await?
            .expect("static provider always returns a credential");
        assert_eq!(cred.key_id, "k");
        assert_eq!(cred.key, "s");
        assert_eq!(cred.algorithm, MacAlgorithm::HmacSha1);
        Ok(())
    }
}
