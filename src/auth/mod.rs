pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::SecurityConfig;

/// Every admin is the same admin; there is no user identity behind the
/// shared secret.
pub const ADMIN_SUBJECT: &str = "admin";
const ISSUER: &str = "study-locker-api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Admin credential required")]
    MissingCredential,

    #[error("Invalid admin credential")]
    InvalidCredential,

    #[error("Invalid session token: {0}")]
    InvalidSession(String),

    #[error("Admin sessions are not configured")]
    SessionsDisabled,

    #[error("Session token generation failed: {0}")]
    TokenGeneration(String),
}

/// What the caller presented as proof of admin capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredential {
    /// `X-Admin-Password` header
    Password(String),
    /// `Authorization: Bearer <token>` issued by `/auth/login`
    Session(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub expires_in: i64,
}

/// Holds the admin secret and session key; verifies admin credentials.
#[derive(Clone)]
pub struct AdminAuthority {
    admin_password: Option<String>,
    session_secret: Option<String>,
    session_ttl: Duration,
}

impl AdminAuthority {
    pub fn new(admin_password: Option<String>, session_secret: Option<String>, session_expiry_hours: u64) -> Self {
        Self {
            admin_password,
            session_secret,
            session_ttl: Duration::hours(session_expiry_hours as i64),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.admin_password.clone(),
            security.session_secret.clone(),
            security.session_expiry_hours,
        )
    }

    pub fn admin_configured(&self) -> bool {
        self.admin_password.is_some()
    }

    /// Constant-time comparison against the configured secret. An unset
    /// secret matches nothing.
    pub fn check_password(&self, candidate: &str) -> bool {
        match self.admin_password.as_deref() {
            Some(secret) => bool::from(secret.as_bytes().ct_eq(candidate.as_bytes())),
            None => false,
        }
    }

    pub fn verify(&self, credential: Option<&AdminCredential>) -> Result<(), AuthError> {
        match credential {
            None => Err(AuthError::MissingCredential),
            Some(AdminCredential::Password(candidate)) => {
                if self.check_password(candidate) {
                    Ok(())
                } else {
                    Err(AuthError::InvalidCredential)
                }
            }
            Some(AdminCredential::Session(token)) => self.validate_session(token).map(|_| ()),
        }
    }

    /// Exchange the admin password for a signed, expiring session token.
    pub fn issue_session(&self, password: &str) -> Result<SessionToken, AuthError> {
        let secret = self.session_secret.as_deref().ok_or(AuthError::SessionsDisabled)?;
        if !self.check_password(password) {
            return Err(AuthError::InvalidCredential);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iss: ISSUER.to_string(),
            exp: (now + self.session_ttl).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(SessionToken {
            token,
            expires_in: self.session_ttl.num_seconds(),
        })
    }

    pub fn validate_session(&self, token: &str) -> Result<Claims, AuthError> {
        let secret = self.session_secret.as_deref().ok_or(AuthError::SessionsDisabled)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        if data.claims.sub != ADMIN_SUBJECT {
            return Err(AuthError::InvalidSession("unexpected subject".to_string()));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> AdminAuthority {
        AdminAuthority::new(Some("s3cret".into()), Some("signing-key".into()), 1)
    }

    #[test]
    fn password_check_is_exact() {
        let auth = authority();
        assert!(auth.check_password("s3cret"));
        assert!(!auth.check_password("s3cre"));
        assert!(!auth.check_password("s3cret "));
        assert!(!auth.check_password(""));
    }

    #[test]
    fn unset_secret_rejects_everything() {
        let auth = AdminAuthority::new(None, None, 1);
        assert!(!auth.admin_configured());
        assert!(!auth.check_password(""));
        assert_eq!(
            auth.verify(Some(&AdminCredential::Password(String::new()))),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn verify_maps_missing_and_wrong() {
        let auth = authority();
        assert_eq!(auth.verify(None), Err(AuthError::MissingCredential));
        assert_eq!(
            auth.verify(Some(&AdminCredential::Password("nope".into()))),
            Err(AuthError::InvalidCredential)
        );
        assert!(auth.verify(Some(&AdminCredential::Password("s3cret".into()))).is_ok());
    }

    #[test]
    fn session_round_trip() {
        let auth = authority();
        let session = auth.issue_session("s3cret").unwrap();
        assert_eq!(session.expires_in, 3600);
        assert!(auth.verify(Some(&AdminCredential::Session(session.token))).is_ok());
    }

    #[test]
    fn session_requires_correct_password() {
        assert_eq!(authority().issue_session("nope").unwrap_err(), AuthError::InvalidCredential);
    }

    #[test]
    fn session_from_other_key_is_rejected() {
        let other = AdminAuthority::new(Some("s3cret".into()), Some("another-key".into()), 1);
        let token = other.issue_session("s3cret").unwrap().token;
        assert!(matches!(authority().validate_session(&token), Err(AuthError::InvalidSession(_))));
    }

    #[test]
    fn expired_session_is_rejected() {
        let auth = authority();
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: ADMIN_SUBJECT.into(),
            iss: ISSUER.into(),
            exp: (past + Duration::hours(1)).timestamp(),
            iat: past.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"signing-key")).unwrap();
        assert!(matches!(auth.validate_session(&token), Err(AuthError::InvalidSession(_))));
    }

    #[test]
    fn sessions_disabled_without_secret() {
        let auth = AdminAuthority::new(Some("s3cret".into()), None, 1);
        assert_eq!(auth.issue_session("s3cret").unwrap_err(), AuthError::SessionsDisabled);
    }

    #[test]
    fn default_config_rejects_self_signed_tokens() {
        let mut security = crate::config::AppConfig::development().security;
        security.admin_password = Some("real-admin-secret".into());
        let auth = AdminAuthority::from_config(&security);

        let now = Utc::now();
        let claims = Claims {
            sub: ADMIN_SUBJECT.into(),
            iss: ISSUER.into(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        for key in ["development-session-secret", "secret", ""] {
            let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(key.as_bytes())).unwrap();
            assert!(auth.verify(Some(&AdminCredential::Session(token))).is_err(), "key {:?} accepted", key);
        }
        assert!(auth.verify(Some(&AdminCredential::Password("real-admin-secret".into()))).is_ok());
    }
}
