//! User profile record and its role enumeration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pessoas_core::{AddressId, OrganizationId, PlanId, UserId};

/// Role a person holds within the platform.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Student,
    Instructor,
    Admin,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl core::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ProfileRole {
    type Err = pessoas_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            other => Err(pessoas_core::DomainError::validation(format!(
                "unknown profile role: {other}"
            ))),
        }
    }
}

/// Full detail record for a user, as returned by the data layer.
///
/// Field presence is the only contract here; nothing is enforced beyond the
/// types themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,

    /// National identification string (CPF).
    pub national_id: String,

    /// Free-form contact string (usually a phone number).
    pub contact: String,

    pub email: String,
    pub first_name: String,
    pub last_name: String,

    pub role: ProfileRole,

    pub plan_id: PlanId,

    /// Whether the account passed identity validation.
    pub validated: bool,

    pub primary_address_id: Option<AddressId>,

    /// Password hash as stored by the data layer. Never serialized outward by
    /// the API; see the response DTOs.
    pub password_hash: String,

    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,

    pub organization_id: OrganizationId,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            national_id: "12345678900".into(),
            contact: "+55 11 99999-0000".into(),
            email: "ana@example.com".into(),
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            role: ProfileRole::Student,
            plan_id: PlanId::new(2),
            validated: true,
            primary_address_id: Some(AddressId::new(7)),
            password_hash: "argon2id$...".into(),
            refresh_token: "rt-abc".into(),
            refresh_token_expires_at: Utc::now(),
            organization_id: OrganizationId::new(3),
        }
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [ProfileRole::Student, ProfileRole::Instructor, ProfileRole::Admin] {
            assert_eq!(role.as_str().parse::<ProfileRole>().unwrap(), role);
        }
    }

    #[test]
    fn profile_serializes_ids_as_plain_numbers() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["plan_id"], 2);
        assert_eq!(json["organization_id"], 3);
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(sample().full_name(), "Ana Silva");
    }
}
