use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Notice, NoticeCategory, NoticeDraft, NoticeFilter, NoticeKind, TournamentDetails},
    error::{AppError, Result},
    repository::NoticeRepository,
};

const NOTICE_COLUMNS: &str = r#"
    id, title, content, category, date, location, organizer, contact_info,
    rules, prize_structure, registration_deadline, max_participants,
    current_participants, is_active, created_by, created_at, updated_at
"#;

#[derive(FromRow)]
struct NoticeRow {
    id: String,
    title: String,
    content: String,
    category: String,
    date: NaiveDateTime,
    location: Option<String>,
    organizer: Option<String>,
    contact_info: Option<String>,
    rules: Option<String>,
    prize_structure: Option<String>,
    registration_deadline: Option<NaiveDateTime>,
    max_participants: Option<i64>,
    current_participants: i64,
    is_active: i32,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Column values for the category-specific part of a notice.
struct KindColumns {
    category: &'static str,
    rules: Option<String>,
    prize_structure: Option<String>,
    registration_deadline: Option<NaiveDateTime>,
    max_participants: Option<i64>,
}

impl KindColumns {
    fn from_kind(kind: NoticeKind) -> Self {
        let category = kind.category().as_str();
        match kind {
            NoticeKind::Tournament(details) => Self {
                category,
                rules: details.rules,
                prize_structure: details.prize_structure,
                registration_deadline: Some(details.registration_deadline.naive_utc()),
                max_participants: Some(details.max_participants),
            },
            NoticeKind::Notice | NoticeKind::Event => Self {
                category,
                rules: None,
                prize_structure: None,
                registration_deadline: None,
                max_participants: None,
            },
        }
    }
}

pub struct SqliteNoticeRepository {
    pool: SqlitePool,
}

impl SqliteNoticeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_notice(row: NoticeRow) -> Result<Notice> {
        let category = NoticeCategory::from_str(&row.category)
            .ok_or_else(|| AppError::Database(format!("Invalid notice category: {}", row.category)))?;

        let kind = match category {
            NoticeCategory::Notice => NoticeKind::Notice,
            NoticeCategory::Event => NoticeKind::Event,
            NoticeCategory::Tournament => {
                let (deadline, max_participants) = row
                    .registration_deadline
                    .zip(row.max_participants)
                    .ok_or_else(|| {
                        AppError::Database(format!(
                            "Tournament {} is missing registration fields",
                            row.id
                        ))
                    })?;
                NoticeKind::Tournament(TournamentDetails {
                    rules: row.rules,
                    prize_structure: row.prize_structure,
                    registration_deadline: DateTime::from_naive_utc_and_offset(deadline, Utc),
                    max_participants,
                    current_participants: row.current_participants,
                })
            }
        };

        Ok(Notice {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            content: row.content,
            kind,
            date: DateTime::from_naive_utc_and_offset(row.date, Utc),
            location: row.location,
            organizer: row.organizer,
            contact_info: row.contact_info,
            is_active: row.is_active != 0,
            created_by: Uuid::parse_str(&row.created_by).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &NoticeFilter) {
        builder.push(" WHERE 1 = 1");

        if let Some(category) = filter.category {
            builder.push(" AND category = ").push_bind(category.as_str());
        }

        if let Some(is_active) = filter.is_active {
            builder.push(" AND is_active = ").push_bind(if is_active { 1i32 } else { 0i32 });
        }

        if let Some(search) = filter.search.as_deref() {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            builder
                .push(" AND search_text LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\'");
        }
    }
}

/// Title and content folded with Unicode lowercasing; `search` is folded the
/// same way before matching.
fn search_text(title: &str, content: &str) -> String {
    format!("{}\n{}", title, content).to_lowercase()
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl NoticeRepository for SqliteNoticeRepository {
    async fn create(&self, draft: NoticeDraft, created_by: Uuid) -> Result<Notice> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let created_by_str = created_by.to_string();
        let kind = KindColumns::from_kind(draft.kind);
        let is_active_int = if draft.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO notices (
                id, title, content, category, date, location, organizer, contact_info,
                rules, prize_structure, registration_deadline, max_participants,
                current_participants, is_active, created_by, created_at, updated_at,
                search_text
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(kind.category)
        .bind(draft.date.naive_utc())
        .bind(&draft.location)
        .bind(&draft.organizer)
        .bind(&draft.contact_info)
        .bind(&kind.rules)
        .bind(&kind.prize_structure)
        .bind(kind.registration_deadline)
        .bind(kind.max_participants)
        .bind(is_active_int)
        .bind(&created_by_str)
        .bind(now)
        .bind(now)
        .bind(search_text(&draft.title, &draft.content))
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created notice".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notice>> {
        let row = sqlx::query_as::<_, NoticeRow>(&format!(
            "SELECT {} FROM notices WHERE id = ?",
            NOTICE_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_notice).transpose()
    }

    async fn list(&self, filter: &NoticeFilter, limit: i64, offset: i64) -> Result<Vec<Notice>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM notices", NOTICE_COLUMNS));
        Self::push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<NoticeRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(Self::row_to_notice)
            .collect()
    }

    async fn count(&self, filter: &NoticeFilter) -> Result<i64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM notices");
        Self::push_filter(&mut builder, filter);

        let (count,): (i64,) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: Uuid, draft: NoticeDraft) -> Result<Option<Notice>> {
        let id_str = id.to_string();
        let kind = KindColumns::from_kind(draft.kind);
        let is_active_int = if draft.is_active { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        // current_participants is owned by the registration workflow.
        let result = sqlx::query(
            r#"
            UPDATE notices
            SET title = ?, content = ?, category = ?, date = ?, location = ?,
                organizer = ?, contact_info = ?, rules = ?, prize_structure = ?,
                registration_deadline = ?, max_participants = ?, is_active = ?,
                updated_at = ?, search_text = ?
            WHERE id = ?
            "#
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(kind.category)
        .bind(draft.date.naive_utc())
        .bind(&draft.location)
        .bind(&draft.organizer)
        .bind(&draft.contact_info)
        .bind(&kind.rules)
        .bind(&kind.prize_structure)
        .bind(kind.registration_deadline)
        .bind(kind.max_participants)
        .bind(is_active_int)
        .bind(now)
        .bind(search_text(&draft.title, &draft.content))
        .bind(&id_str)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notices WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off"), "50\\% off");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_search_text_folds_non_ascii() {
        assert_eq!(search_text("École karate", "ÜBER Seminar"), "école karate\nüber seminar");
    }
}
