use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{NewRegistration, RegistrationOutcome, TournamentRegistration},
    error::{is_unique_violation, AppError, Result},
    repository::RegistrationRepository,
};

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    name: String,
    skb_id: String,
    tournament_id: String,
    registration_date: NaiveDateTime,
}

#[derive(FromRow)]
struct TournamentStateRow {
    category: String,
    is_active: i32,
    registration_deadline: Option<NaiveDateTime>,
}

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: RegistrationRow) -> Result<TournamentRegistration> {
        Ok(TournamentRegistration {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            skb_id: row.skb_id,
            tournament_id: Uuid::parse_str(&row.tournament_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            registration_date: DateTime::from_naive_utc_and_offset(row.registration_date, Utc),
        })
    }

    async fn register_in_transaction(
        pool: SqlitePool,
        tournament_id: Uuid,
        registration: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome> {
        let mut conn = pool.acquire().await?;

        // IMMEDIATE takes the write lock up front, so concurrent registrations
        // queue on the busy timeout instead of failing on lock upgrade.
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result = Self::register_locked(&mut conn, tournament_id, registration, now).await;
        let finish = match result {
            Ok(RegistrationOutcome::Registered(_)) => "COMMIT",
            _ => "ROLLBACK",
        };

        if let Err(e) = sqlx::query(finish).execute(&mut *conn).await {
            tracing::error!("Failed to {} registration transaction: {}", finish, e);
            // Never hand a connection with an open transaction back to the pool.
            drop(conn.detach());
            return Err(e.into());
        }

        result
    }

    /// Runs inside `BEGIN IMMEDIATE`. The counter bump comes first so the
    /// open/deadline/capacity conditions are evaluated under the write lock.
    async fn register_locked(
        conn: &mut SqliteConnection,
        tournament_id: Uuid,
        registration: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome> {
        let tournament_id_str = tournament_id.to_string();
        let now_naive = now.naive_utc();

        let bumped = sqlx::query(
            r#"
            UPDATE notices
            SET current_participants = current_participants + 1
            WHERE id = ?
              AND category = 'tournament'
              AND is_active = 1
              AND registration_deadline >= ?
              AND current_participants < max_participants
            "#
        )
        .bind(&tournament_id_str)
        .bind(now_naive)
        .execute(&mut *conn)
        .await?;

        if bumped.rows_affected() == 0 {
            return Self::rejection_reason(conn, &tournament_id_str, now_naive).await;
        }

        let id = Uuid::new_v4();
        let inserted = sqlx::query(
            r#"
            INSERT INTO tournament_registrations (id, name, skb_id, tournament_id, registration_date)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&registration.name)
        .bind(&registration.skb_id)
        .bind(&tournament_id_str)
        .bind(now_naive)
        .execute(&mut *conn)
        .await;

        match inserted {
            Ok(_) => Ok(RegistrationOutcome::Registered(TournamentRegistration {
                id,
                name: registration.name,
                skb_id: registration.skb_id,
                tournament_id,
                registration_date: now,
            })),
            Err(e) if is_unique_violation(&e) => Ok(RegistrationOutcome::AlreadyRegistered),
            Err(e) => Err(e.into()),
        }
    }

    async fn rejection_reason(
        conn: &mut SqliteConnection,
        tournament_id: &str,
        now: NaiveDateTime,
    ) -> Result<RegistrationOutcome> {
        let state = sqlx::query_as::<_, TournamentStateRow>(
            "SELECT category, is_active, registration_deadline FROM notices WHERE id = ?"
        )
        .bind(tournament_id)
        .fetch_optional(&mut *conn)
        .await?;

        let outcome = match state {
            None => RegistrationOutcome::NotOpen,
            Some(s) if s.category != "tournament" || s.is_active == 0 => RegistrationOutcome::NotOpen,
            Some(s) if s.registration_deadline.map_or(true, |deadline| deadline < now) => {
                RegistrationOutcome::DeadlinePassed
            }
            Some(_) => RegistrationOutcome::Full,
        };

        Ok(outcome)
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn register(
        &self,
        tournament_id: Uuid,
        registration: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome> {
        // Runs on its own task so a dropped request cannot abandon the
        // transaction halfway through.
        let pool = self.pool.clone();
        tokio::spawn(Self::register_in_transaction(pool, tournament_id, registration, now))
            .await
            .map_err(|e| AppError::Internal(format!("Registration task failed: {}", e)))?
    }

    async fn exists(&self, tournament_id: Uuid, skb_id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM tournament_registrations WHERE tournament_id = ? AND skb_id = ?"
        )
        .bind(tournament_id.to_string())
        .bind(skb_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn list_by_tournament(&self, tournament_id: Uuid) -> Result<Vec<TournamentRegistration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, name, skb_id, tournament_id, registration_date
            FROM tournament_registrations
            WHERE tournament_id = ?
            ORDER BY registration_date DESC, rowid DESC
            "#
        )
        .bind(tournament_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_registration)
            .collect()
    }
}
