use std::sync::Arc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{Notice, NoticeDraft, NoticeFilter},
    error::{AppError, Result},
    repository::NoticeRepository,
};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: i64,
    pub pages: i64,
    pub total: i64,
}

impl Pagination {
    pub fn new(current: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self { current, pages, total }
    }
}

#[derive(Debug, Serialize)]
pub struct NoticePage {
    pub notices: Vec<Notice>,
    pub pagination: Pagination,
}

pub fn not_found() -> AppError {
    AppError::NotFound("Notice not found".to_string())
}

pub struct NoticeService {
    repo: Arc<dyn NoticeRepository>,
}

impl NoticeService {
    pub fn new(repo: Arc<dyn NoticeRepository>) -> Self {
        Self { repo }
    }

    /// Pages are 1-based; `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub async fn list(&self, filter: &NoticeFilter, page: i64, limit: i64) -> Result<NoticePage> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(limit);

        let notices = self.repo.list(filter, limit, offset).await?;
        let total = self.repo.count(filter).await?;

        Ok(NoticePage {
            notices,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Notice> {
        self.repo.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, draft: NoticeDraft, created_by: Uuid) -> Result<Notice> {
        let notice = self.repo.create(draft, created_by).await?;
        tracing::info!(
            notice_id = %notice.id,
            category = notice.category().as_str(),
            admin_id = %created_by,
            "Notice created"
        );
        Ok(notice)
    }

    pub async fn update(&self, id: Uuid, draft: NoticeDraft) -> Result<Notice> {
        let notice = self.repo.update(id, draft).await?.ok_or_else(not_found)?;
        tracing::info!(notice_id = %id, "Notice updated");
        Ok(notice)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!(notice_id = %id, "Notice deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::new(3, 3, 7).pages, 3);
    }
}
