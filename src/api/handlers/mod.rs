pub mod auth;
pub mod members;
pub mod notices;
pub mod root;

use uuid::Uuid;
use crate::error::{AppError, Result};

/// A malformed path id is a 400 carrying a resource-specific message.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(message.to_string()))
}
