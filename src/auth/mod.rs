use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{AdminRole, AdminUser},
    error::{AppError, Result},
};

/// Claims carried in an admin bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: AdminRole,
    pub iat: i64,
    pub exp: i64,
}

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
}

impl AuthService {
    pub fn new(secret: &str, token_duration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration: Duration::hours(token_duration_hours),
        }
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    pub fn issue_token(&self, user: &AdminUser) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_duration).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Expired, malformed or foreign-signed tokens all map to `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                AppError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(role: AdminRole) -> AdminUser {
        AdminUser {
            id: Uuid::new_v4(),
            username: "sensei".to_string(),
            email: "sensei@example.com".to_string(),
            role,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hashing() {
        let hash = AuthService::hash_password("Karate2025").unwrap();
        assert!(AuthService::verify_password("Karate2025", &hash).unwrap());
        assert!(!AuthService::verify_password("karate2025", &hash).unwrap());
    }

    #[test]
    fn test_token_roundtrip() {
        let auth = AuthService::new("test-secret", 1);
        let user = admin(AdminRole::SuperAdmin);
        let token = auth.issue_token(&user).unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, AdminRole::SuperAdmin);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = AuthService::new("one-secret", 1)
            .issue_token(&admin(AdminRole::Admin))
            .unwrap();
        let result = AuthService::new("another-secret", 1).verify_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Default validation allows 60s of leeway, so expire well past it.
        let auth = AuthService::new("test-secret", -2);
        let token = auth.issue_token(&admin(AdminRole::Admin)).unwrap();
        assert!(matches!(auth.verify_token(&token), Err(AppError::Unauthorized)));
    }
}
