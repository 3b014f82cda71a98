use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pessoas_core::{OrganizationId, UserId};

use crate::Role;

/// JWT claims model (transport-agnostic).
///
/// This is the minimal set of claims the API expects once a token has been
/// decoded and its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    /// Organization context for the token.
    pub organization_id: OrganizationId,

    /// Roles granted within the organization.
    pub roles: Vec<Role>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token could not be decoded")]
    Malformed,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims(issued_offset: i64, expires_offset: i64, now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(1),
            organization_id: OrganizationId::new(9),
            roles: vec![Role::new("admin")],
            issued_at: now + Duration::seconds(issued_offset),
            expires_at: now + Duration::seconds(expires_offset),
        }
    }

    #[test]
    fn accepts_token_inside_window() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims(-60, 60, now), now), Ok(()));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(-120, -60, now), now),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_token_from_the_future() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(60, 120, now), now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(60, -60, now), now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
