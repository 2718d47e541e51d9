use std::fmt::{Debug, Formatter};

use crate::constants::*;
use tentapp_core::{utils::Redact, Context};

/// Config carries the MAC credential settings of an app.
#[derive(Clone, Default)]
pub struct Config {
    /// `key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TENT_MAC_KEY_ID`]
    pub key_id: Option<String>,
    /// `key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TENT_MAC_KEY`]
    pub key: Option<String>,
    /// `algorithm` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TENT_MAC_ALGORITHM`]
    ///
    /// `hmac-sha-256` is used if neither is set.
    pub algorithm: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set key_id
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set algorithm
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Load config from env, keeping the values already set.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(TENT_MAC_KEY_ID) {
            self.key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TENT_MAC_KEY) {
            self.key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TENT_MAC_ALGORITHM) {
            self.algorithm.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key_id", &Redact::from(&self.key_id))
            .field("key", &Redact::from(&self.key))
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tentapp_core::StaticEnv;

    #[test]
    fn test_from_env_keeps_explicit_values() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (TENT_MAC_KEY_ID.to_string(), "env_key_id".to_string()),
                (TENT_MAC_KEY.to_string(), "env_key".to_string()),
            ]),
        });

        let config = Config::new().with_key_id("explicit").from_env(&ctx);
        assert_eq!(config.key_id.as_deref(), Some("explicit"));
        assert_eq!(config.key.as_deref(), Some("env_key"));
        assert!(config.algorithm.is_none());
    }
}
