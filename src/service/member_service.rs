use std::sync::Arc;
use uuid::Uuid;
use crate::{
    domain::{Member, MemberDraft},
    error::{AppError, Result},
    repository::MemberRepository,
};

fn not_found() -> AppError {
    AppError::NotFound("Member not found".to_string())
}

pub struct MemberService {
    repo: Arc<dyn MemberRepository>,
}

impl MemberService {
    pub fn new(repo: Arc<dyn MemberRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Member>> {
        self.repo.list(active_only).await
    }

    /// Inactive members are hidden from the public directory.
    pub async fn get_public(&self, id: Uuid) -> Result<Member> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(not_found)
    }

    pub async fn get(&self, id: Uuid) -> Result<Member> {
        self.repo.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, draft: MemberDraft) -> Result<Member> {
        // Check for duplicate email
        if self.repo.find_by_email(&draft.email).await?.is_some() {
            return Err(AppError::Conflict("A member with this email already exists".to_string()));
        }

        let member = self.repo.create(draft).await?;
        tracing::info!(member_id = %member.id, "Member created");
        Ok(member)
    }

    pub async fn update(&self, id: Uuid, draft: MemberDraft) -> Result<Member> {
        if let Some(other) = self.repo.find_by_email(&draft.email).await? {
            if other.id != id {
                return Err(AppError::Conflict("A member with this email already exists".to_string()));
            }
        }

        let member = self.repo.update(id, draft).await?.ok_or_else(not_found)?;
        tracing::info!(member_id = %id, "Member updated");
        Ok(member)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!(member_id = %id, "Member deleted");
        Ok(())
    }
}
