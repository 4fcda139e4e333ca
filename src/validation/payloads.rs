use serde::Deserialize;
use validator::Validate;

use crate::{
    domain::{
        AdminRole, BloodGroup, Gender, MemberDraft, NewRegistration, NoticeCategory,
        NoticeDraft, NoticeKind, TournamentDetails,
    },
    error::{AppError, Result},
};

use super::{rules, trim, trim_optional, FieldError, Payload};

fn conversion_error(field: &str, message: &str) -> AppError {
    AppError::Validation(vec![FieldError::new(field, message)])
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminRegistrationPayload {
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom(function = "rules::username_chars", message = "Username can only contain letters, numbers, and underscores")
    )]
    pub username: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom(function = "rules::password_strength", message = "Password must contain at least one lowercase letter, one uppercase letter, and one number")
    )]
    pub password: String,
    #[validate(custom(function = "rules::admin_role", message = "Role must be admin or super-admin"))]
    pub role: Option<String>,
}

impl Payload for AdminRegistrationPayload {
    fn normalize(&mut self) {
        trim(&mut self.username);
        trim(&mut self.email);
        self.email = self.email.to_lowercase();
        trim_optional(&mut self.role);
    }
}

impl AdminRegistrationPayload {
    pub fn role(&self) -> AdminRole {
        self.role
            .as_deref()
            .and_then(AdminRole::from_str)
            .unwrap_or(AdminRole::Admin)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Payload for LoginPayload {
    fn normalize(&mut self) {
        trim(&mut self.username);
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberPayload {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(custom(function = "rules::mobile_number", message = "Please provide a valid mobile number"))]
    pub mobile: String,
    #[validate(custom(function = "rules::iso8601_date", message = "Please provide a valid date of birth"))]
    pub date_of_birth: String,
    #[validate(custom(function = "rules::gender", message = "Gender must be male, female, or other"))]
    pub gender: String,
    #[validate(custom(function = "rules::blood_group", message = "Please provide a valid blood group"))]
    pub blood_group: String,
    #[validate(length(max = 100, message = "Belt cannot exceed 100 characters"))]
    pub belt: Option<String>,
    #[validate(length(max = 500, message = "Achievements cannot exceed 500 characters"))]
    pub achievements: Option<String>,
    #[validate(custom(function = "rules::iso8601_timestamp", message = "Please provide a valid join date"))]
    pub joined_at: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for MemberPayload {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.email);
        self.email = self.email.to_lowercase();
        trim(&mut self.mobile);
        trim(&mut self.date_of_birth);
        trim(&mut self.gender);
        trim(&mut self.blood_group);
        trim_optional(&mut self.belt);
        trim_optional(&mut self.achievements);
        trim_optional(&mut self.joined_at);
    }
}

impl MemberPayload {
    pub fn into_draft(self) -> Result<MemberDraft> {
        let date_of_birth = rules::parse_date(&self.date_of_birth)
            .ok_or_else(|| conversion_error("dateOfBirth", "Please provide a valid date of birth"))?;
        let gender = Gender::from_str(&self.gender)
            .ok_or_else(|| conversion_error("gender", "Gender must be male, female, or other"))?;
        let blood_group = BloodGroup::from_str(&self.blood_group)
            .ok_or_else(|| conversion_error("bloodGroup", "Please provide a valid blood group"))?;
        let joined_at = self
            .joined_at
            .as_deref()
            .map(|raw| {
                rules::parse_timestamp(raw)
                    .ok_or_else(|| conversion_error("joinedAt", "Please provide a valid join date"))
            })
            .transpose()?;

        Ok(MemberDraft {
            name: self.name,
            email: self.email,
            mobile: self.mobile,
            date_of_birth,
            gender,
            blood_group,
            belt: self.belt,
            achievements: self.achievements,
            joined_at,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct NoticePayload {
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "Content must be between 10 and 5000 characters"))]
    pub content: String,
    #[validate(custom(function = "rules::notice_category", message = "Category must be notice, event, or tournament"))]
    pub category: String,
    #[validate(custom(function = "rules::iso8601_timestamp", message = "Please provide a valid date"))]
    pub date: String,
    #[validate(length(max = 200, message = "Location cannot exceed 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 100, message = "Organizer cannot exceed 100 characters"))]
    pub organizer: Option<String>,
    #[validate(length(max = 300, message = "Contact info cannot exceed 300 characters"))]
    pub contact_info: Option<String>,
    #[validate(length(max = 2000, message = "Rules cannot exceed 2000 characters"))]
    pub rules: Option<String>,
    #[validate(length(max = 1000, message = "Prize structure cannot exceed 1000 characters"))]
    pub prize_structure: Option<String>,
    #[validate(custom(function = "rules::iso8601_timestamp", message = "Please provide a valid registration deadline"))]
    pub registration_deadline: Option<String>,
    #[validate(range(min = 1, message = "Maximum participants must be at least 1"))]
    pub max_participants: Option<i64>,
    pub is_active: Option<bool>,
}

impl Payload for NoticePayload {
    fn normalize(&mut self) {
        trim(&mut self.title);
        trim(&mut self.content);
        trim(&mut self.category);
        trim(&mut self.date);
        trim_optional(&mut self.location);
        trim_optional(&mut self.organizer);
        trim_optional(&mut self.contact_info);
        trim_optional(&mut self.rules);
        trim_optional(&mut self.prize_structure);
        trim_optional(&mut self.registration_deadline);
    }

    fn cross_field_rules(&self, errors: &mut Vec<FieldError>) {
        if NoticeCategory::from_str(&self.category) != Some(NoticeCategory::Tournament) {
            return;
        }
        if self.registration_deadline.is_none() {
            errors.push(FieldError::new(
                "registrationDeadline",
                "Registration deadline is required for tournaments",
            ));
        }
        if self.max_participants.is_none() {
            errors.push(FieldError::new(
                "maxParticipants",
                "Maximum participants is required for tournaments",
            ));
        }
    }
}

impl NoticePayload {
    pub fn into_draft(self) -> Result<NoticeDraft> {
        let date = rules::parse_timestamp(&self.date)
            .ok_or_else(|| conversion_error("date", "Please provide a valid date"))?;
        let category = NoticeCategory::from_str(&self.category).ok_or_else(|| {
            conversion_error("category", "Category must be notice, event, or tournament")
        })?;

        let kind = match category {
            NoticeCategory::Notice => NoticeKind::Notice,
            NoticeCategory::Event => NoticeKind::Event,
            NoticeCategory::Tournament => {
                let registration_deadline = self
                    .registration_deadline
                    .as_deref()
                    .and_then(rules::parse_timestamp)
                    .ok_or_else(|| {
                        conversion_error(
                            "registrationDeadline",
                            "Registration deadline is required for tournaments",
                        )
                    })?;
                let max_participants = self.max_participants.ok_or_else(|| {
                    conversion_error(
                        "maxParticipants",
                        "Maximum participants is required for tournaments",
                    )
                })?;
                NoticeKind::Tournament(TournamentDetails {
                    rules: self.rules,
                    prize_structure: self.prize_structure,
                    registration_deadline,
                    max_participants,
                    current_participants: 0,
                })
            }
        };

        Ok(NoticeDraft {
            title: self.title,
            content: self.content,
            kind,
            date,
            location: self.location,
            organizer: self.organizer,
            contact_info: self.contact_info,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationPayload {
    #[validate(
        length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"),
        custom(function = "rules::letters_and_spaces", message = "Name can only contain letters and spaces")
    )]
    pub name: String,
    #[validate(
        length(min = 3, max = 20, message = "SKB ID must be between 3 and 20 characters"),
        custom(function = "rules::skb_id_chars", message = "SKB ID can only contain uppercase letters and numbers")
    )]
    pub skb_id: String,
}

impl Payload for RegistrationPayload {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.skb_id);
    }
}

impl From<RegistrationPayload> for NewRegistration {
    fn from(payload: RegistrationPayload) -> Self {
        Self {
            name: payload.name,
            skb_id: payload.skb_id,
        }
    }
}
