use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{AdminRole, AdminUser, CreateAdminUser},
    error::{is_unique_violation, AppError, Result},
    repository::AdminUserRepository,
};

#[derive(FromRow)]
struct AdminUserRow {
    id: String,
    username: String,
    email: String,
    role: String,
    is_active: i32,
    last_login: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAdminUserRepository {
    pool: SqlitePool,
}

impl SqliteAdminUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: AdminUserRow) -> Result<AdminUser> {
        Ok(AdminUser {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            username: row.username,
            email: row.email,
            role: AdminRole::from_str(&row.role)
                .ok_or_else(|| AppError::Database(format!("Invalid admin role: {}", row.role)))?,
            is_active: row.is_active != 0,
            last_login: row.last_login.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<AdminUser>> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r#"
            SELECT id, username, email, role, is_active, last_login, created_at, updated_at
            FROM admin_users
            WHERE {} = ?
            "#,
            column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl AdminUserRepository for SqliteAdminUserRepository {
    async fn create(&self, user: CreateAdminUser) -> Result<AdminUser> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO admin_users (
                id, username, email, password_hash, role, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username or email already exists".to_string())
            } else {
                e.into()
            }
        })?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created admin user".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>> {
        self.find_one("id", &id.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        self.find_one("email", email).await
    }

    async fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM admin_users WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn record_login(&self, id: Uuid) -> Result<()> {
        let now = Utc::now().naive_utc();
        sqlx::query("UPDATE admin_users SET last_login = ? WHERE id = ?")
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
