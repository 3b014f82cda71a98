//! Secret resolution at startup.
//!
//! Sensitive values (signing keys, database credentials) are never written
//! into the settings files directly; they are referenced by name and resolved
//! through a [`SecretProvider`] once, before services are wired.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret {0:?} holds a non-UTF-8 value")]
    NotUnicode(String),
}

/// Resolves a named secret from an external store.
pub trait SecretProvider: Send + Sync {
    /// Look up `name`. `Ok(None)` means the store has no such secret.
    fn resolve(&self, name: &str) -> Result<Option<String>, SecretError>;
}

/// Provider backed by process environment variables.
///
/// An optional prefix namespaces lookups, e.g. prefix `PESSOAS_SECRET_` turns
/// `resolve("JWT_SECRET")` into a read of `PESSOAS_SECRET_JWT_SECRET`.
pub struct EnvSecretProvider {
    prefix: Option<String>,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecretProvider {
    fn resolve(&self, name: &str) -> Result<Option<String>, SecretError> {
        let var = match &self.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        };
        match std::env::var(&var) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::NotUnicode(var)),
        }
    }
}

/// Fixed in-memory provider, for tests and local tooling.
pub struct StaticSecretProvider {
    values: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new(values: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn resolve(&self, name: &str) -> Result<Option<String>, SecretError> {
        Ok(self.values.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_provider_reads_prefixed_variables() {
        unsafe { std::env::set_var("PESSOAS_SECRET_TEST_ONLY_KEY", "hunter2") };
        let provider = EnvSecretProvider::with_prefix("PESSOAS_SECRET_");
        assert_eq!(
            provider.resolve("TEST_ONLY_KEY").unwrap(),
            Some("hunter2".to_string())
        );
        unsafe { std::env::remove_var("PESSOAS_SECRET_TEST_ONLY_KEY") };
    }

    #[test]
    fn env_provider_returns_none_for_missing_secret() {
        let provider = EnvSecretProvider::new();
        assert_eq!(provider.resolve("PESSOAS_NO_SUCH_SECRET").unwrap(), None);
    }

    #[test]
    fn static_provider_returns_configured_values() {
        let provider =
            StaticSecretProvider::new([("DB_PASSWORD".to_string(), "s3cret".to_string())]);
        assert_eq!(
            provider.resolve("DB_PASSWORD").unwrap(),
            Some("s3cret".to_string())
        );
        assert_eq!(provider.resolve("OTHER").unwrap(), None);
    }
}
