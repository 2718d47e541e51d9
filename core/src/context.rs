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

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Context carries the collaborators used while discovering entities and
/// signing requests.
///
/// This crate ships no transport. Until [`Context::with_http_send`] and
/// [`Context::with_env`] are called, sending fails and the env is empty.
///
/// ## Example
///
/// ```
/// use tentapp_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// ```
#[derive(Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("http", &self.http)
            .field("env", &self.env)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a Context whose transport and env are both no-ops.
    ///
    /// ```
    /// use tentapp_core::{Context, StaticEnv};
    ///
    /// let ctx = Context::new().with_env(StaticEnv::default());
    /// assert!(ctx.env_var("TENT_MAC_KEY").is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
            env: Arc::new(NoopEnv),
        }
    }

    /// Use `http` as transport.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Read environment variables from `env`.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Send `req` through the configured transport.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Look up one variable. Missing and non utf-8 values are both `None`.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Snapshot of every variable the env exposes.
    #[inline]
    pub fn env_vars(&self) -> HashMap<String, String> {
        self.env.vars()
    }
}

/// HttpSend is the transport every discovery probe and API call goes through.
///
/// It must support at least `GET` and `HEAD` with custom headers and hand
/// back the status, the full (multi-valued) header map and the body bytes.
/// Redirects, TLS and timeouts are the implementation's business; a
/// [`RequestTimeout`] extension on the request asks for a per-request limit.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send `req` and return the whole response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// RequestTimeout is attached to `http::Request::extensions` to pass a
/// caller configured timeout through to the [`HttpSend`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(pub Duration);

/// Env gives access to environment variables so credential providers can be
/// tested without touching the process environment.
pub trait Env: Debug + Send + Sync + 'static {
    /// Value of `key`, `None` when unset or not utf-8.
    fn var(&self, key: &str) -> Option<String>;

    /// All variables as a map.
    fn vars(&self) -> HashMap<String, String>;
}

/// Env backed by the process environment.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn vars(&self) -> HashMap<String, String> {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// Env backed by a fixed map, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// Variables visible through this env.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn vars(&self) -> HashMap<String, String> {
        self.envs.clone()
    }
}

/// Transport used until one is configured. Every call fails with
/// `ErrorKind::Unexpected`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(format!(
            "can't send {} {}: context has no http transport",
            req.method(),
            req.uri()
        )))
    }
}

/// Env used until one is configured. It is always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn vars(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_default_context_has_no_transport() {
        let ctx = Context::new();
        let req = http::Request::get("https://example.test/")
            .body(Bytes::new())
            .unwrap();

        let err = ctx.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_static_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([("TENT_MAC_KEY_ID".to_string(), "k".to_string())]),
        });

        assert_eq!(ctx.env_var("TENT_MAC_KEY_ID").as_deref(), Some("k"));
        assert!(ctx.env_var("TENT_MAC_KEY").is_none());
        assert_eq!(ctx.env_vars().len(), 1);
    }
}
