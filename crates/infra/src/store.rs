//! User store: the read surface behind the HTTP handlers.
//!
//! The local environment runs on [`InMemoryUserStore`]; deployed environments
//! use [`PostgresUserStore`] after migrations have run.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use pessoas_core::{AddressId, OrganizationId, PlanId, UserId};
use pessoas_domain::{ProfileRole, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record for user {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Read/write access to user profile records, scoped by organization.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user's detail record. Cross-organization lookups come back as
    /// `None`, indistinguishable from a missing record.
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: UserId,
    ) -> Result<Option<UserProfile>, StoreError>;

    /// All profiles belonging to an organization, ordered by id.
    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserProfile>, StoreError>;

    async fn insert(&self, profile: UserProfile) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Mutex-guarded map keyed by user id. BTreeMap keeps listing order stable.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<BTreeMap<UserId, UserProfile>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for tests; the local bootstrap starts empty.
    pub fn seeded(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let store = Self::new();
        {
            let mut users = store.users.lock().expect("user store mutex poisoned");
            for profile in profiles {
                users.insert(profile.id, profile);
            }
        }
        store
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: UserId,
    ) -> Result<Option<UserProfile>, StoreError> {
        let users = self.users.lock().expect("user store mutex poisoned");
        Ok(users
            .get(&id)
            .filter(|p| p.organization_id == organization_id)
            .cloned())
    }

    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserProfile>, StoreError> {
        let users = self.users.lock().expect("user store mutex poisoned");
        Ok(users
            .values()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut users = self.users.lock().expect("user store mutex poisoned");
        users.insert(profile.id, profile);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Postgres store
// ---------------------------------------------------------------------------

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    national_id: String,
    contact: String,
    email: String,
    first_name: String,
    last_name: String,
    role: String,
    plan_id: i64,
    validated: bool,
    primary_address_id: Option<i64>,
    password_hash: String,
    refresh_token: String,
    refresh_token_expires_at: DateTime<Utc>,
    organization_id: i64,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: ProfileRole = row.role.parse().map_err(|_| StoreError::Corrupt {
            id: row.id,
            reason: format!("unknown role {:?}", row.role),
        })?;

        Ok(UserProfile {
            id: UserId::new(row.id),
            national_id: row.national_id,
            contact: row.contact,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            plan_id: PlanId::new(row.plan_id),
            validated: row.validated,
            primary_address_id: row.primary_address_id.map(AddressId::new),
            password_hash: row.password_hash,
            refresh_token: row.refresh_token,
            refresh_token_expires_at: row.refresh_token_expires_at,
            organization_id: OrganizationId::new(row.organization_id),
        })
    }
}

const SELECT_COLUMNS: &str = "id, national_id, contact, email, first_name, last_name, role, \
     plan_id, validated, primary_address_id, password_hash, refresh_token, \
     refresh_token_expires_at, organization_id";

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        id: UserId,
    ) -> Result<Option<UserProfile>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id.value())
        .bind(organization_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn list_by_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<UserProfile>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE organization_id = $1 ORDER BY id"
        ))
        .bind(organization_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserProfile::try_from).collect()
    }

    async fn insert(&self, profile: UserProfile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, national_id, contact, email, first_name, last_name, role, \
             plan_id, validated, primary_address_id, password_hash, refresh_token, \
             refresh_token_expires_at, organization_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(profile.id.value())
        .bind(&profile.national_id)
        .bind(&profile.contact)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.role.as_str())
        .bind(profile.plan_id.value())
        .bind(profile.validated)
        .bind(profile.primary_address_id.map(|a| a.value()))
        .bind(&profile.password_hash)
        .bind(&profile.refresh_token)
        .bind(profile.refresh_token_expires_at)
        .bind(profile.organization_id.value())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
