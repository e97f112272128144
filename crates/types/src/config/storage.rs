//! Storage adapter configuration: commit durability and lock waiting.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// How far a commit must reach before the store acknowledges it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommitDurability {
    /// The store may acknowledge before the write reaches stable media.
    ///
    /// A crash can lose the most recent commits, never a partial one.
    #[default]
    Relaxed,
    /// The store flushes to stable media before acknowledging.
    Immediate,
}

/// Storage adapter configuration.
///
/// # Validation Rules
///
/// - `lock_timeout`, when set, must be non-zero
///
/// # Example
///
/// ```no_run
/// # use std::time::Duration;
/// # use rowstore_types::config::{CommitDurability, StorageConfig};
/// let config = StorageConfig::builder()
///     .durability(CommitDurability::Relaxed)
///     .lock_timeout(Duration::from_millis(500))
///     .build()
///     .expect("valid storage config");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Durability requested for every commit. Default: relaxed.
    #[serde(default)]
    pub durability: CommitDurability,
    /// Maximum time a `select` or `commit` waits for the storage lock.
    ///
    /// Unset means wait indefinitely.
    #[serde(default, with = "super::humantime_serde_opt")]
    #[schemars(with = "Option<String>")]
    pub lock_timeout: Option<Duration>,
}

#[bon::bon]
impl StorageConfig {
    /// Creates a new storage configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `lock_timeout` is zero.
    #[builder]
    pub fn new(
        #[builder(default)] durability: CommitDurability,
        lock_timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let config = Self { durability, lock_timeout };
        config.validate()?;
        Ok(config)
    }
}

impl StorageConfig {
    /// Validates the configuration values.
    ///
    /// Call after deserialization to ensure values are within valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Validation {
                message: "lock_timeout must be non-zero when set".to_string(),
            });
        }
        Ok(())
    }
}
