use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{NewRegistration, RegistrationOutcome, TournamentRegistration},
    error::{AppError, Result},
    repository::{NoticeRepository, RegistrationRepository},
    service::notice_service,
};

pub const NOT_OPEN: &str = "Tournament not found or not active";
pub const DEADLINE_PASSED: &str = "Registration deadline has passed";
pub const FULL: &str = "Tournament is full";
pub const ALREADY_REGISTERED: &str = "You are already registered for this tournament";

pub struct RegistrationService {
    notice_repo: Arc<dyn NoticeRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
}

impl RegistrationService {
    pub fn new(
        notice_repo: Arc<dyn NoticeRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self { notice_repo, registration_repo }
    }

    /// Checks run in a fixed order and the first failure wins: open
    /// tournament, deadline, capacity, duplicate. The storage write repeats
    /// them atomically, so a request that loses a race still gets the
    /// matching reason.
    pub async fn register(
        &self,
        tournament_id: Uuid,
        registration: NewRegistration,
    ) -> Result<TournamentRegistration> {
        let now = Utc::now();

        let notice = self
            .notice_repo
            .find_by_id(tournament_id)
            .await?
            .filter(|n| n.is_active);
        let details = notice
            .as_ref()
            .and_then(|n| n.tournament())
            .ok_or_else(|| AppError::NotFound(NOT_OPEN.to_string()))?;

        if details.deadline_passed(now) {
            return Err(AppError::BadRequest(DEADLINE_PASSED.to_string()));
        }

        if details.is_full() {
            return Err(AppError::BadRequest(FULL.to_string()));
        }

        if self.registration_repo.exists(tournament_id, &registration.skb_id).await? {
            return Err(AppError::BadRequest(ALREADY_REGISTERED.to_string()));
        }

        let skb_id = registration.skb_id.clone();
        match self.registration_repo.register(tournament_id, registration, now).await? {
            RegistrationOutcome::Registered(registration) => {
                tracing::info!(
                    tournament_id = %tournament_id,
                    skb_id = %registration.skb_id,
                    "Tournament registration recorded"
                );
                Ok(registration)
            }
            outcome => {
                tracing::debug!(
                    tournament_id = %tournament_id,
                    skb_id = %skb_id,
                    ?outcome,
                    "Registration lost a race after pre-checks"
                );
                Err(rejection(outcome))
            }
        }
    }

    pub async fn list(&self, tournament_id: Uuid) -> Result<Vec<TournamentRegistration>> {
        if self.notice_repo.find_by_id(tournament_id).await?.is_none() {
            return Err(notice_service::not_found());
        }
        self.registration_repo.list_by_tournament(tournament_id).await
    }
}

fn rejection(outcome: RegistrationOutcome) -> AppError {
    match outcome {
        RegistrationOutcome::NotOpen => AppError::NotFound(NOT_OPEN.to_string()),
        RegistrationOutcome::DeadlinePassed => AppError::BadRequest(DEADLINE_PASSED.to_string()),
        RegistrationOutcome::Full => AppError::BadRequest(FULL.to_string()),
        RegistrationOutcome::AlreadyRegistered => AppError::BadRequest(ALREADY_REGISTERED.to_string()),
        RegistrationOutcome::Registered(_) => {
            AppError::Internal("Successful registration treated as rejection".to_string())
        }
    }
}
