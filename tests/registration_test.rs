mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use noticeboard::{
    domain::{AdminRole, NewRegistration, NoticeKind, RegistrationOutcome},
    error::AppError,
    repository::{
        NoticeRepository, RegistrationRepository, SqliteNoticeRepository,
        SqliteRegistrationRepository,
    },
    service::registration_service::{
        RegistrationService, ALREADY_REGISTERED, DEADLINE_PASSED, FULL, NOT_OPEN,
    },
};
use sqlx::SqlitePool;
use uuid::Uuid;

use common::{create_admin, file_pool, notice_draft, test_pool, tournament_draft};

struct Fixture {
    pool: SqlitePool,
    notices: Arc<SqliteNoticeRepository>,
    registrations: Arc<SqliteRegistrationRepository>,
    service: RegistrationService,
    admin_id: Uuid,
}

async fn fixture() -> anyhow::Result<Fixture> {
    let pool = test_pool().await?;
    let admin = create_admin(&pool, "admin", AdminRole::Admin).await?;
    let notices = Arc::new(SqliteNoticeRepository::new(pool.clone()));
    let registrations = Arc::new(SqliteRegistrationRepository::new(pool.clone()));
    let service = RegistrationService::new(notices.clone(), registrations.clone());

    Ok(Fixture {
        pool,
        notices,
        registrations,
        service,
        admin_id: admin.id,
    })
}

fn candidate(name: &str, skb_id: &str) -> NewRegistration {
    NewRegistration {
        name: name.to_string(),
        skb_id: skb_id.to_string(),
    }
}

async fn participant_count(pool: &SqlitePool, id: Uuid) -> anyhow::Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT current_participants FROM notices WHERE id = ?")
        .bind(id.to_string())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn message(err: AppError) -> String {
    match err {
        AppError::NotFound(msg) | AppError::BadRequest(msg) => msg,
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_register_success_increments_counter() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Spring open", 4, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;

    let registration = f.service.register(tournament.id, candidate("Aiko Tanaka", "SKB001")).await?;
    assert_eq!(registration.tournament_id, tournament.id);
    assert_eq!(registration.skb_id, "SKB001");
    assert_eq!(participant_count(&f.pool, tournament.id).await?, 1);

    let listed = f.service.list(tournament.id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, registration.id);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_registration_rejected() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Spring open", 4, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;

    f.service.register(tournament.id, candidate("Aiko Tanaka", "SKB001")).await?;
    let err = f.service
        .register(tournament.id, candidate("Someone Else", "SKB001"))
        .await
        .unwrap_err();

    assert_eq!(message(err), ALREADY_REGISTERED);
    assert_eq!(participant_count(&f.pool, tournament.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_unique_violation_rolls_back_increment() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Spring open", 4, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;

    let now = Utc::now();
    let first = f.registrations
        .register(tournament.id, candidate("Aiko Tanaka", "SKB001"), now)
        .await?;
    assert!(matches!(first, RegistrationOutcome::Registered(_)));

    // Straight to storage, skipping the service's duplicate pre-check
    let second = f.registrations
        .register(tournament.id, candidate("Aiko Tanaka", "SKB001"), now)
        .await?;
    assert!(matches!(second, RegistrationOutcome::AlreadyRegistered));
    assert_eq!(participant_count(&f.pool, tournament.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_full_tournament_rejected() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Small cup", 1, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;

    f.service.register(tournament.id, candidate("Aiko Tanaka", "SKB001")).await?;
    let err = f.service
        .register(tournament.id, candidate("Rahim Uddin", "SKB002"))
        .await
        .unwrap_err();

    assert_eq!(message(err), FULL);
    assert_eq!(participant_count(&f.pool, tournament.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_deadline_checked_before_capacity() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Past cup", 1, Utc::now() - Duration::hours(1)), f.admin_id)
        .await?;

    sqlx::query("UPDATE notices SET current_participants = 1 WHERE id = ?")
        .bind(tournament.id.to_string())
        .execute(&f.pool)
        .await?;

    let err = f.service
        .register(tournament.id, candidate("Aiko Tanaka", "SKB001"))
        .await
        .unwrap_err();
    assert_eq!(message(err), DEADLINE_PASSED);

    // Storage reports the same reason when it is reached directly
    let outcome = f.registrations
        .register(tournament.id, candidate("Aiko Tanaka", "SKB001"), Utc::now())
        .await?;
    assert!(matches!(outcome, RegistrationOutcome::DeadlinePassed));

    Ok(())
}

#[tokio::test]
async fn test_closed_or_missing_tournament_not_found() -> anyhow::Result<()> {
    let f = fixture().await?;

    let plain = f.notices
        .create(notice_draft("Plain notice", NoticeKind::Notice), f.admin_id)
        .await?;
    let mut inactive = tournament_draft("Hidden cup", 4, Utc::now() + Duration::days(2));
    inactive.is_active = false;
    let inactive = f.notices.create(inactive, f.admin_id).await?;

    for id in [plain.id, inactive.id, Uuid::new_v4()] {
        let err = f.service.register(id, candidate("Aiko Tanaka", "SKB001")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == NOT_OPEN));
    }

    Ok(())
}

#[tokio::test]
async fn test_list_unknown_tournament_not_found() -> anyhow::Result<()> {
    let f = fixture().await?;
    let err = f.service.list(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_registrations_for_last_slot() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Single slot", 1, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;

    let (first, second) = tokio::join!(
        f.service.register(tournament.id, candidate("Aiko Tanaka", "SKB001")),
        f.service.register(tournament.id, candidate("Rahim Uddin", "SKB002")),
    );

    let results = [first, second];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let failure = results.into_iter().find_map(|r| r.err()).expect("one registration fails");
    assert_eq!(message(failure), FULL);
    assert_eq!(participant_count(&f.pool, tournament.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_many_concurrent_registrations_never_overfill() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Busy cup", 3, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;

    let attempts = (0..10).map(|i| {
        f.service.register(tournament.id, candidate("Club Member", &format!("SKB{:03}", i)))
    });
    let results = futures_util::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert_eq!(participant_count(&f.pool, tournament.id).await?, 3);
    assert_eq!(f.service.list(tournament.id).await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_registrations_removed_with_tournament() -> anyhow::Result<()> {
    let f = fixture().await?;
    let tournament = f.notices
        .create(tournament_draft("Spring open", 4, Utc::now() + Duration::days(2)), f.admin_id)
        .await?;
    f.service.register(tournament.id, candidate("Aiko Tanaka", "SKB001")).await?;

    assert!(f.notices.delete(tournament.id).await?);
    assert!(f.registrations.list_by_tournament(tournament.id).await?.is_empty());

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_contended_registrations_across_connections() -> anyhow::Result<()> {
    let (_dir, pool) = file_pool(8).await?;
    let admin = create_admin(&pool, "admin", AdminRole::Admin).await?;
    let notices = Arc::new(SqliteNoticeRepository::new(pool.clone()));
    let registrations = Arc::new(SqliteRegistrationRepository::new(pool.clone()));
    let service = Arc::new(RegistrationService::new(notices.clone(), registrations.clone()));

    let tournament = notices
        .create(tournament_draft("Crowded cup", 3, Utc::now() + Duration::days(2)), admin.id)
        .await?;

    // SKB000 is submitted twice
    let handles: Vec<_> = (0..40)
        .map(|i| {
            let service = service.clone();
            let skb_id = format!("SKB{:03}", if i == 39 { 0 } else { i });
            tokio::spawn(async move {
                service.register(tournament.id, candidate("Club Member", &skb_id)).await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => accepted += 1,
            Err(err) => {
                let msg = message(err);
                assert!(msg == FULL || msg == ALREADY_REGISTERED, "unexpected rejection: {}", msg);
            }
        }
    }

    assert_eq!(accepted, 3);
    assert_eq!(participant_count(&pool, tournament.id).await?, 3);
    assert_eq!(registrations.list_by_tournament(tournament.id).await?.len(), 3);

    Ok(())
}
