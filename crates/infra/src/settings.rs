//! Layered application settings.
//!
//! Configuration is merged from three sources, later sources overriding
//! earlier ones:
//!
//! 1. `appsettings.json` (required),
//! 2. `appsettings.<environment>.json` (optional),
//! 3. process environment variables prefixed `PESSOAS__`, with `__` as the
//!    path separator (`PESSOAS__SERVER__PORT=9000` overrides `server.port`).
//!
//! After merging, `${NAME}` placeholders inside string values are substituted
//! through the configured [`SecretProvider`], so credentials never live in
//! the files themselves.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::secrets::{SecretError, SecretProvider};

/// Environment variable naming the active environment.
pub const ENVIRONMENT_VAR: &str = "PESSOAS_ENVIRONMENT";

/// Prefix for configuration overrides taken from the process environment.
pub const OVERRIDE_PREFIX: &str = "PESSOAS__";

/// Deployment environment the process runs in.
///
/// `local` gets the developer-friendly configuration path; any other name is
/// treated as deployed (migrations before traffic, generic error bodies).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Local,
    Named(String),
}

impl Environment {
    /// Read the environment name from `PESSOAS_ENVIRONMENT` (default `local`).
    pub fn from_process_env() -> Self {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(name) if !name.trim().is_empty() => name.parse().unwrap_or(Environment::Local),
            _ => Environment::Local,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Environment::Local => "local",
            Environment::Named(name) => name,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Environment::Local)
    }
}

impl core::str::FromStr for Environment {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("local") {
            Ok(Environment::Local)
        } else {
            Ok(Environment::Named(s.trim().to_string()))
        }
    }
}

impl core::fmt::Display for Environment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("settings do not match the expected shape: {0}")]
    Invalid(serde_json::Error),

    #[error("placeholder ${{{0}}} could not be resolved by the secret provider")]
    MissingSecret(String),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorsSettings {
    /// Origins allowed by the CORS policy. Empty means same-origin only.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitSettings {
    /// Length of the fixed window, in seconds.
    pub window_seconds: u64,

    /// Requests allowed per client IP per window.
    pub max_requests: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            max_requests: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Postgres connection string. Optional in the local environment, which
    /// runs against the in-memory store.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct JwtSettings {
    /// HS256 signing secret. Usually `${...}`-substituted from the secret
    /// provider rather than written into a file.
    pub secret: Option<String>,
}

/// Fully merged, typed application settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: ServerSettings,
    pub cors: CorsSettings,
    pub rate_limit: RateLimitSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
}

impl Settings {
    /// Load settings for `environment` from `dir`, applying the three-layer
    /// merge and placeholder substitution described at module level.
    pub fn load(
        dir: impl AsRef<Path>,
        environment: &Environment,
        secrets: &dyn SecretProvider,
    ) -> Result<Self, SettingsError> {
        let dir = dir.as_ref();

        let base_path = dir.join("appsettings.json");
        let mut merged = read_json(&base_path)?;

        let override_path = dir.join(format!("appsettings.{}.json", environment.name()));
        if override_path.exists() {
            let overrides = read_json(&override_path)?;
            merge_values(&mut merged, overrides);
        }

        apply_env_overrides(&mut merged, std::env::vars().filter_map(|(k, v)| {
            k.strip_prefix(OVERRIDE_PREFIX)
                .map(|rest| (rest.to_string(), v))
        }));

        substitute_placeholders(&mut merged, secrets)?;

        serde_json::from_value(merged).map_err(SettingsError::Invalid)
    }
}

fn read_json(path: &Path) -> Result<Value, SettingsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Deep-merge `overlay` into `base`: objects merge key-by-key, everything
/// else is replaced outright.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, overlay) => *base_slot = overlay,
    }
}

/// Apply `KEY__SUBKEY=value` style overrides (prefix already stripped).
///
/// Values that parse as JSON scalars keep their type; anything else becomes a
/// string.
fn apply_env_overrides(merged: &mut Value, vars: impl Iterator<Item = (String, String)>) {
    for (key, raw) in vars {
        let path: Vec<String> = key
            .split("__")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if path.is_empty() {
            continue;
        }

        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
            _ => Value::String(raw),
        };

        let mut slot = &mut *merged;
        for segment in &path[..path.len() - 1] {
            if !slot.is_object() {
                *slot = Value::Object(serde_json::Map::new());
            }
            slot = slot
                .as_object_mut()
                .expect("slot was just made an object")
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
        if !slot.is_object() {
            *slot = Value::Object(serde_json::Map::new());
        }
        slot.as_object_mut()
            .expect("slot was just made an object")
            .insert(path[path.len() - 1].clone(), value);
    }
}

/// Replace `${NAME}` placeholders in string leaves via the secret provider.
fn substitute_placeholders(
    value: &mut Value,
    secrets: &dyn SecretProvider,
) -> Result<(), SettingsError> {
    match value {
        Value::String(s) => {
            if s.contains("${") {
                *s = expand(s, secrets)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                substitute_placeholders(item, secrets)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                substitute_placeholders(item, secrets)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn expand(input: &str, secrets: &dyn SecretProvider) -> Result<String, SettingsError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                let resolved = secrets
                    .resolve(name)?
                    .ok_or_else(|| SettingsError::MissingSecret(name.to_string()))?;
                out.push_str(&resolved);
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder; keep it verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
