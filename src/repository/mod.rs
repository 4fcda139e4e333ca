use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod admin_user_repository;
pub mod member_repository;
pub mod notice_repository;
pub mod registration_repository;

pub use admin_user_repository::SqliteAdminUserRepository;
pub use member_repository::SqliteMemberRepository;
pub use notice_repository::SqliteNoticeRepository;
pub use registration_repository::SqliteRegistrationRepository;

#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn create(&self, draft: NoticeDraft, created_by: Uuid) -> Result<Notice>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notice>>;
    async fn list(&self, filter: &NoticeFilter, limit: i64, offset: i64) -> Result<Vec<Notice>>;
    async fn count(&self, filter: &NoticeFilter) -> Result<i64>;
    /// Replaces the editable fields. Returns `None` when no notice has this id.
    async fn update(&self, id: Uuid, draft: NoticeDraft) -> Result<Option<Notice>>;
    /// Returns `false` when no notice has this id.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Inserts the registration and bumps the tournament's participant
    /// counter in one transaction, re-checking that the tournament is open,
    /// before its deadline and below capacity.
    async fn register(
        &self,
        tournament_id: Uuid,
        registration: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome>;
    async fn exists(&self, tournament_id: Uuid, skb_id: &str) -> Result<bool>;
    async fn list_by_tournament(&self, tournament_id: Uuid) -> Result<Vec<TournamentRegistration>>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, draft: MemberDraft) -> Result<Member>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>>;
    async fn list(&self, active_only: bool) -> Result<Vec<Member>>;
    async fn update(&self, id: Uuid, draft: MemberDraft) -> Result<Option<Member>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn create(&self, user: CreateAdminUser) -> Result<AdminUser>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>>;
    async fn get_password_hash(&self, username: &str) -> Result<Option<String>>;
    async fn record_login(&self, id: Uuid) -> Result<()>;
}
