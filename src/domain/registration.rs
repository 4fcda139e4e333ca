use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRegistration {
    pub id: Uuid,
    pub name: String,
    pub skb_id: String,
    pub tournament_id: Uuid,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub skb_id: String,
}

/// Result of the storage-level registration attempt. Every variant except
/// `Registered` leaves the database untouched.
#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered(TournamentRegistration),
    NotOpen,
    DeadlinePassed,
    Full,
    AlreadyRegistered,
}
