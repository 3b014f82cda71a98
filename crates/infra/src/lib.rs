//! `pessoas-infra` — configuration, secrets, and data access.
//!
//! Everything the bootstrap wires together that touches the outside world:
//! layered settings files, secret resolution, the Postgres pool and its
//! migrations, and the user store behind the HTTP handlers.

pub mod db;
pub mod secrets;
pub mod settings;
pub mod store;

pub use secrets::{EnvSecretProvider, SecretProvider, StaticSecretProvider};
pub use settings::{Environment, Settings, SettingsError};
pub use store::{InMemoryUserStore, PostgresUserStore, StoreError, UserStore};
