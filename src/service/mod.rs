pub mod account_service;
pub mod member_service;
pub mod notice_service;
pub mod registration_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::auth::AuthService;
use crate::repository::*;
use account_service::AccountService;
use member_service::MemberService;
use notice_service::NoticeService;
use registration_service::RegistrationService;

pub struct ServiceContext {
    pub notice_service: Arc<NoticeService>,
    pub registration_service: Arc<RegistrationService>,
    pub member_service: Arc<MemberService>,
    pub account_service: Arc<AccountService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, auth_service: Arc<AuthService>) -> Self {
        // Create repositories
        let notice_repo: Arc<dyn NoticeRepository> =
            Arc::new(SqliteNoticeRepository::new(db_pool.clone()));
        let registration_repo: Arc<dyn RegistrationRepository> =
            Arc::new(SqliteRegistrationRepository::new(db_pool.clone()));
        let member_repo: Arc<dyn MemberRepository> =
            Arc::new(SqliteMemberRepository::new(db_pool.clone()));
        let admin_repo: Arc<dyn AdminUserRepository> =
            Arc::new(SqliteAdminUserRepository::new(db_pool.clone()));

        // Create services
        let notice_service = Arc::new(NoticeService::new(notice_repo.clone()));
        let registration_service = Arc::new(RegistrationService::new(notice_repo, registration_repo));
        let member_service = Arc::new(MemberService::new(member_repo));
        let account_service = Arc::new(AccountService::new(admin_repo, auth_service));

        Self {
            notice_service,
            registration_service,
            member_service,
            account_service,
            db_pool,
        }
    }
}
