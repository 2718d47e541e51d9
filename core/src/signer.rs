use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, OnceLock};

/// Signer is the main struct used to sign the request.
///
/// The credential is set at most once. After that it is used for every
/// request signed by this signer (and its clones) until they are dropped;
/// there is no way to replace it.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<OnceLock<K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer without credential.
    pub fn new(ctx: Context, builder: impl SignRequest<Credential = K>) -> Self {
        Self {
            ctx,
            builder: Arc::new(builder),
            credential: Arc::new(OnceLock::new()),
        }
    }

    /// Set the credential used by this signer.
    ///
    /// Fails with `CredentialIncomplete` if the credential is not valid, and
    /// with `CredentialConflict` if a credential has already been set. In both
    /// cases the signer keeps its previous state.
    pub fn set_credential(&self, credential: K) -> Result<()> {
        if !credential.is_valid() {
            return Err(Error::credential_incomplete(
                "credential must carry both a key id and a key",
            ));
        }

        self.credential.set(credential).map_err(|_| {
            log::warn!("refusing to replace the credential of an authenticated signer");
            Error::credential_conflict("credential has already been set for this signer")
        })
    }

    /// Load the credential from `provider` and set it.
    ///
    /// A provider returning nothing fails with `CredentialIncomplete`.
    pub async fn load_credential(
        &self,
        provider: &dyn ProvideCredential<Credential = K>,
    ) -> Result<()> {
        let credential = provider.provide_credential(&self.ctx).await?.ok_or_else(|| {
            Error::credential_incomplete(format!("no credential provided by {provider:?}"))
        })?;
        self.set_credential(credential)
    }

    /// Check if a credential has been set.
    pub fn has_credential(&self) -> bool {
        self.credential.get().is_some()
    }

    /// Get the credential if it has been set.
    pub fn credential(&self) -> Option<&K> {
        self.credential.get()
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let credential = self.credential.get().ok_or_else(|| {
            Error::credential_incomplete("request can't be signed before a credential is set")
        })?;

        self.builder
            .sign_request(&self.ctx, req, Some(credential))
            .await
    }
}
