//! Response DTOs and JSON mapping.
//!
//! The detail shape mirrors the stored record minus credential material: the
//! password hash and the refresh token itself never leave the service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use pessoas_domain::{ProfileRole, UserProfile};

/// Compact listing entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    #[schema(value_type = i64)]
    pub id: pessoas_core::UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: ProfileRole,
    pub validated: bool,
}

/// Full detail record for a single user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDetail {
    #[schema(value_type = i64)]
    pub id: pessoas_core::UserId,
    pub national_id: String,
    pub contact: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String)]
    pub role: ProfileRole,
    #[schema(value_type = i64)]
    pub plan_id: pessoas_core::PlanId,
    pub validated: bool,
    #[schema(value_type = Option<i64>)]
    pub primary_address_id: Option<pessoas_core::AddressId>,
    pub refresh_token_expires_at: DateTime<Utc>,
    #[schema(value_type = i64)]
    pub organization_id: pessoas_core::OrganizationId,
}

impl From<UserProfile> for UserSummary {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            role: profile.role,
            validated: profile.validated,
        }
    }
}

impl From<UserProfile> for UserDetail {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            national_id: profile.national_id,
            contact: profile.contact,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            role: profile.role,
            plan_id: profile.plan_id,
            validated: profile.validated,
            primary_address_id: profile.primary_address_id,
            refresh_token_expires_at: profile.refresh_token_expires_at,
            organization_id: profile.organization_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use pessoas_core::{OrganizationId, PlanId, UserId};

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            national_id: "12345678900".into(),
            contact: "+55 11 99999-0000".into(),
            email: "ana@example.com".into(),
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            role: ProfileRole::Admin,
            plan_id: PlanId::new(4),
            validated: true,
            primary_address_id: None,
            password_hash: "argon2id$super-secret".into(),
            refresh_token: "rt-super-secret".into(),
            refresh_token_expires_at: Utc::now(),
            organization_id: OrganizationId::new(2),
        }
    }

    #[test]
    fn detail_never_exposes_credentials() {
        let json = serde_json::to_value(UserDetail::from(profile())).unwrap();
        let rendered = json.to_string();
        assert!(!rendered.contains("super-secret"));
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
        // The expiry itself is not sensitive and stays visible.
        assert!(json.get("refresh_token_expires_at").is_some());
    }

    #[test]
    fn summary_keeps_the_listing_fields() {
        let json = serde_json::to_value(UserSummary::from(profile())).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["role"], "admin");
        assert_eq!(json["validated"], true);
        assert!(json.get("national_id").is_none());
    }
}
