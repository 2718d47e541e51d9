use std::str::FromStr;
use std::sync::Arc;

use http::{HeaderMap, Method, Uri};
use log::debug;
use tentapp_core::{Context, Error, ProvideCredential, Result, Signer};
use tentapp_mac::{Credential, RequestSigner};

use crate::discovery::{discover, ResolvedEntity};
use crate::Config;

/// Client talks to the API of one discovered Tent entity.
///
/// A client is always built through discovery, so it never exists without an
/// API root. Credentials are optional and can be set exactly once; clones
/// share them.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    entity: Arc<ResolvedEntity>,
    signer: Signer<Credential>,
}

impl Client {
    /// Discover `entity_url` and build an unauthenticated client for it.
    ///
    /// Any discovery error aborts construction.
    pub async fn discover(ctx: Context, config: Config, entity_url: &str) -> Result<Self> {
        let entity = discover(&ctx, &config, entity_url).await?;
        Ok(Self::from_resolved(ctx, config, entity))
    }

    /// Build an unauthenticated client from an already resolved entity.
    pub fn from_resolved(ctx: Context, config: Config, entity: ResolvedEntity) -> Self {
        let signer = Signer::new(ctx.clone(), RequestSigner::new());

        Self {
            ctx,
            config: Arc::new(config),
            entity: Arc::new(entity),
            signer,
        }
    }

    /// Canonical identity of the entity.
    pub fn entity(&self) -> &str {
        self.entity.entity()
    }

    /// API roots of the entity. Calls only ever go to the first one.
    pub fn servers(&self) -> &[String] {
        self.entity.servers()
    }

    /// Config in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Authenticate every following call with `credential`.
    ///
    /// Fails with `CredentialIncomplete` if the key id or key is empty and
    /// with `CredentialConflict` if the client is already authenticated. The
    /// discovered state is left untouched either way.
    pub fn authenticate(&self, credential: Credential) -> Result<()> {
        self.signer.set_credential(credential)
    }

    /// Authenticate with the credential loaded from `provider`.
    pub async fn authenticate_with(
        &self,
        provider: &dyn ProvideCredential<Credential = Credential>,
    ) -> Result<()> {
        self.signer.load_credential(provider).await
    }

    /// Check whether calls are signed.
    pub fn is_authenticated(&self) -> bool {
        self.signer.has_credential()
    }

    /// Headers a request to `url` would carry before signing.
    ///
    /// See [`Config::prepare_headers`].
    pub fn prepare_headers(&self, url: &str, overrides: &HeaderMap) -> Result<HeaderMap> {
        self.config.prepare_headers(&Uri::from_str(url)?, overrides)
    }

    /// `GET` a resource below the API root and decode its json body.
    ///
    /// The target is the first API root followed by `resource`, and by
    /// `/<id>` when `id` is given. The request is signed when the client is
    /// authenticated.
    ///
    /// # Errors
    ///
    /// - `MalformedTarget` if the target isn't an absolute url.
    /// - `Response` if the request can't be sent or the status is not a
    ///   success. The status, if any, is available through `Error::status`.
    /// - `Decode` if the body is not json.
    pub async fn get(&self, resource: &str, id: Option<&str>) -> Result<serde_json::Value> {
        let url = self.resource_url(resource, id);
        let uri = Uri::from_str(&url)?;
        if uri.scheme().is_none() || uri.host().map_or(true, str::is_empty) {
            return Err(Error::malformed_target(format!(
                "request target {url} must be absolute"
            )));
        }

        let mut req = self.config.build_request(Method::GET, uri, &HeaderMap::new())?;
        if self.is_authenticated() {
            let (mut parts, body) = req.into_parts();
            self.signer.sign(&mut parts).await?;
            req = http::Request::from_parts(parts, body);
        }

        debug!(
            "sending GET {url}, authenticated: {}",
            self.is_authenticated()
        );
        let resp = self.ctx.http_send(req).await.map_err(|e| {
            Error::response(format!("failed to send GET {url}")).with_source(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(
                Error::response(format!("GET {url} answered with status {status}"))
                    .with_status(status),
            );
        }

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::decode(format!("response of GET {url} is not valid json")).with_source(e)
        })
    }

    /// List posts, or fetch a single post when `id` is given.
    pub async fn get_posts(&self, id: Option<&str>) -> Result<serde_json::Value> {
        self.get("/posts", id).await
    }

    /// List followings, or fetch a single following when `id` is given.
    pub async fn get_followings(&self, id: Option<&str>) -> Result<serde_json::Value> {
        self.get("/followings", id).await
    }

    fn resource_url(&self, resource: &str, id: Option<&str>) -> String {
        let root = self.entity.api_root().trim_end_matches('/');

        let mut url = String::with_capacity(root.len() + resource.len() + 1);
        url.push_str(root);
        if !resource.starts_with('/') {
            url.push('/');
        }
        url.push_str(resource);
        if let Some(id) = id {
            url.push('/');
            url.push_str(id);
        }
        url
    }
}
