use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{BloodGroup, Gender, Member, MemberDraft},
    error::{is_unique_violation, AppError, Result},
    repository::MemberRepository,
};

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct MemberRow {
    id: String,
    name: String,
    email: String,
    mobile: String,
    date_of_birth: NaiveDate,
    gender: String,
    blood_group: String,
    belt: Option<String>,
    achievements: Option<String>,
    joined_at: NaiveDateTime,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_member(row: MemberRow) -> Result<Member> {
        Ok(Member {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            email: row.email,
            mobile: row.mobile,
            date_of_birth: row.date_of_birth,
            gender: Gender::from_str(&row.gender)
                .ok_or_else(|| AppError::Database(format!("Invalid gender: {}", row.gender)))?,
            blood_group: BloodGroup::from_str(&row.blood_group)
                .ok_or_else(|| AppError::Database(format!("Invalid blood group: {}", row.blood_group)))?,
            belt: row.belt,
            achievements: row.achievements,
            joined_at: DateTime::from_naive_utc_and_offset(row.joined_at, Utc),
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn map_write_error(err: sqlx::Error) -> AppError {
        if is_unique_violation(&err) {
            AppError::Conflict("A member with this email already exists".to_string())
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn create(&self, draft: MemberDraft) -> Result<Member> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let joined_at = draft.joined_at.map(|dt| dt.naive_utc()).unwrap_or(now);
        let is_active_int = if draft.is_active { 1i32 } else { 0i32 };

        sqlx::query(
            r#"
            INSERT INTO members (
                id, name, email, mobile, date_of_birth, gender, blood_group,
                belt, achievements, joined_at, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.mobile)
        .bind(draft.date_of_birth)
        .bind(draft.gender.as_str())
        .bind(draft.blood_group.as_str())
        .bind(&draft.belt)
        .bind(&draft.achievements)
        .bind(joined_at)
        .bind(is_active_int)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created member".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, mobile, date_of_birth, gender, blood_group,
                   belt, achievements, joined_at, is_active, created_at, updated_at
            FROM members
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_member).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, mobile, date_of_birth, gender, blood_group,
                   belt, achievements, joined_at, is_active, created_at, updated_at
            FROM members
            WHERE email = ?
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_member).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, mobile, date_of_birth, gender, blood_group,
                   belt, achievements, joined_at, is_active, created_at, updated_at
            FROM members
            WHERE is_active = 1 OR ? = 0
            ORDER BY joined_at ASC, name ASC
            "#
        )
        .bind(if active_only { 1i32 } else { 0i32 })
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_member)
            .collect()
    }

    async fn update(&self, id: Uuid, draft: MemberDraft) -> Result<Option<Member>> {
        let now = Utc::now().naive_utc();
        let is_active_int = if draft.is_active { 1i32 } else { 0i32 };

        let result = sqlx::query(
            r#"
            UPDATE members
            SET name = ?, email = ?, mobile = ?, date_of_birth = ?, gender = ?,
                blood_group = ?, belt = ?, achievements = ?, joined_at = COALESCE(?, joined_at),
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.mobile)
        .bind(draft.date_of_birth)
        .bind(draft.gender.as_str())
        .bind(draft.blood_group.as_str())
        .bind(&draft.belt)
        .bind(&draft.achievements)
        .bind(draft.joined_at.map(|dt| dt.naive_utc()))
        .bind(is_active_int)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
