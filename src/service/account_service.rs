use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::AuthService,
    domain::{AdminRole, AdminUser, CreateAdminUser},
    error::{AppError, Result},
    repository::AdminUserRepository,
};

pub struct AccountService {
    repo: Arc<dyn AdminUserRepository>,
    auth_service: Arc<AuthService>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AdminUserRepository>, auth_service: Arc<AuthService>) -> Self {
        Self { repo, auth_service }
    }

    /// Returns a bearer token for the admin. Unknown usernames, wrong
    /// passwords and deactivated accounts are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, AdminUser)> {
        let password_hash = self
            .repo
            .get_password_hash(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !AuthService::verify_password(password, &password_hash)? {
            tracing::warn!(username, "Failed admin login");
            return Err(AppError::InvalidCredentials);
        }

        let user = self
            .repo
            .find_by_username(username)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::InvalidCredentials)?;

        self.repo.record_login(user.id).await?;
        let token = self.auth_service.issue_token(&user)?;

        tracing::info!(admin_id = %user.id, "Admin logged in");
        Ok((token, user))
    }

    pub async fn register(
        &self,
        username: String,
        email: String,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser> {
        if self.repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = AuthService::hash_password(password)?;
        let user = self
            .repo
            .create(CreateAdminUser {
                username,
                email,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(admin_id = %user.id, role = user.role.as_str(), "Admin account created");
        Ok(user)
    }

    /// Resolves the admin behind a verified token, rejecting deactivated accounts.
    pub async fn authenticate(&self, token: &str) -> Result<AdminUser> {
        let claims = self.auth_service.verify_token(token)?;
        let user = self.find(claims.sub).await?.ok_or(AppError::Unauthorized)?;
        if !user.is_active {
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<AdminUser>> {
        self.repo.find_by_id(id).await
    }
}
