//! Resource key types for conflict tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// A shared resource an order touches (liquidity pool, account balance, ...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Create a new resource key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the key is usable for conflict detection
    ///
    /// Returns the reason on failure.
    pub fn validate(&self, max_len: usize) -> Result<(), &'static str> {
        if self.0.is_empty() {
            return Err("empty key");
        }
        if self.0.trim().is_empty() {
            return Err("blank key");
        }
        if self.0.chars().any(char::is_control) {
            return Err("control character in key");
        }
        if self.0.len() > max_len {
            return Err("key too long");
        }
        Ok(())
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ResourceKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Label conventions for well-known resource kinds
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConvention {
    /// Prefix for liquidity pool keys
    pub pool_prefix: String,
    /// Prefix for account keys
    pub account_prefix: String,
}

impl Default for KeyConvention {
    fn default() -> Self {
        Self {
            pool_prefix: "pool_".to_string(),
            account_prefix: "account_".to_string(),
        }
    }
}

impl KeyConvention {
    /// Key for a liquidity pool
    pub fn pool(&self, name: &str) -> ResourceKey {
        ResourceKey(format!("{}{}", self.pool_prefix, name))
    }

    /// Key for an account
    pub fn account(&self, id: &str) -> ResourceKey {
        ResourceKey(format!("{}{}", self.account_prefix, id))
    }
}
