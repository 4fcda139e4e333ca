#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use noticeboard::{
    auth::AuthService,
    domain::{AdminRole, AdminUser, CreateAdminUser, NoticeDraft, NoticeKind, TournamentDetails},
    repository::{AdminUserRepository, SqliteAdminUserRepository},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, SqlitePool};

pub const ADMIN_PASSWORD: &str = "Secret123";

/// Every connection to `sqlite::memory:` opens its own empty database, so
/// the pool is capped at one connection.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub async fn create_admin(pool: &SqlitePool, username: &str, role: AdminRole) -> anyhow::Result<AdminUser> {
    let repo = SqliteAdminUserRepository::new(pool.clone());
    let user = repo.create(CreateAdminUser {
        username: username.to_string(),
        email: format!("{}@club.local", username),
        password_hash: AuthService::hash_password(ADMIN_PASSWORD)?,
        role,
    }).await?;
    Ok(user)
}

pub fn notice_draft(title: &str, kind: NoticeKind) -> NoticeDraft {
    NoticeDraft {
        title: title.to_string(),
        content: format!("{} - full details for club members", title),
        kind,
        date: Utc::now() + Duration::days(7),
        location: Some("Main hall".to_string()),
        organizer: None,
        contact_info: None,
        is_active: true,
    }
}

pub fn tournament_draft(title: &str, max_participants: i64, deadline: DateTime<Utc>) -> NoticeDraft {
    notice_draft(
        title,
        NoticeKind::Tournament(TournamentDetails {
            rules: Some("Standard kumite rules".to_string()),
            prize_structure: None,
            registration_deadline: deadline,
            max_participants,
            current_participants: 0,
        }),
    )
}

/// A pool over a real database file, so concurrent writers contend for the
/// SQLite write lock across connections. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn file_pool(max_connections: u32) -> anyhow::Result<(tempfile::TempDir, SqlitePool)> {
    let dir = tempfile::tempdir()?;
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("noticeboard.db"))
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok((dir, pool))
}
