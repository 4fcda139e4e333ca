use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published record. Whether it is a plain notice, an event or a
/// tournament is carried by `kind`; only tournaments have registration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub kind: NoticeKind,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub contact_info: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notice {
    pub fn category(&self) -> NoticeCategory {
        self.kind.category()
    }

    pub fn tournament(&self) -> Option<&TournamentDetails> {
        match &self.kind {
            NoticeKind::Tournament(details) => Some(details),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum NoticeKind {
    Notice,
    Event,
    Tournament(TournamentDetails),
}

impl NoticeKind {
    pub fn category(&self) -> NoticeCategory {
        match self {
            NoticeKind::Notice => NoticeCategory::Notice,
            NoticeKind::Event => NoticeCategory::Event,
            NoticeKind::Tournament(_) => NoticeCategory::Tournament,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDetails {
    pub rules: Option<String>,
    pub prize_structure: Option<String>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: i64,
    #[serde(default)]
    pub current_participants: i64,
}

impl TournamentDetails {
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now > self.registration_deadline
    }

    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeCategory {
    Notice,
    Event,
    Tournament,
}

impl NoticeCategory {
    pub const ALL: [NoticeCategory; 3] = [
        NoticeCategory::Notice,
        NoticeCategory::Event,
        NoticeCategory::Tournament,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeCategory::Notice => "notice",
            NoticeCategory::Event => "event",
            NoticeCategory::Tournament => "tournament",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "notice" => Some(NoticeCategory::Notice),
            "event" => Some(NoticeCategory::Event),
            "tournament" => Some(NoticeCategory::Tournament),
            _ => None,
        }
    }
}

/// The admin-editable part of a notice. For tournaments the participant
/// counter inside `kind` is ignored by storage; only registrations move it.
#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    pub kind: NoticeKind,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub contact_info: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NoticeFilter {
    pub category: Option<NoticeCategory>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tournament(max: i64, current: i64) -> TournamentDetails {
        TournamentDetails {
            rules: None,
            prize_structure: None,
            registration_deadline: Utc::now() + Duration::days(1),
            max_participants: max,
            current_participants: current,
        }
    }

    #[test]
    fn test_category_roundtrip() {
        for category in NoticeCategory::ALL {
            assert_eq!(NoticeCategory::from_str(category.as_str()), Some(category));
        }
        assert_eq!(NoticeCategory::from_str("all"), None);
        assert_eq!(NoticeCategory::from_str("Tournament"), None);
    }

    #[test]
    fn test_capacity() {
        assert!(!tournament(2, 1).is_full());
        assert!(tournament(2, 2).is_full());
        assert!(tournament(1, 3).is_full());
    }

    #[test]
    fn test_deadline() {
        let details = tournament(10, 0);
        assert!(!details.deadline_passed(details.registration_deadline));
        assert!(details.deadline_passed(details.registration_deadline + Duration::seconds(1)));
    }

    #[test]
    fn test_kind_serializes_with_category_tag() {
        let kind = NoticeKind::Tournament(tournament(8, 3));
        let value = serde_json::to_value(&kind).unwrap();
        assert_eq!(value["category"], "tournament");
        assert_eq!(value["maxParticipants"], 8);
        assert_eq!(value["currentParticipants"], 3);

        let value = serde_json::to_value(NoticeKind::Event).unwrap();
        assert_eq!(value, serde_json::json!({ "category": "event" }));
    }
}
