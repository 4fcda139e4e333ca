use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use validator::ValidationError;

use crate::domain::{AdminRole, BloodGroup, Gender, NoticeCategory};

fn failure(code: &'static str) -> Result<(), ValidationError> {
    Err(ValidationError::new(code))
}

/// Letters, digits and underscores.
pub fn username_chars(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        failure("username_chars")
    }
}

/// At least one lowercase letter, one uppercase letter and one digit.
pub fn password_strength(value: &str) -> Result<(), ValidationError> {
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    if lower && upper && digit {
        Ok(())
    } else {
        failure("password_strength")
    }
}

pub fn letters_and_spaces(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        Ok(())
    } else {
        failure("letters_and_spaces")
    }
}

pub fn skb_id_chars(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        Ok(())
    } else {
        failure("skb_id_chars")
    }
}

pub fn mobile_number(value: &str) -> Result<(), ValidationError> {
    let len = value.len();
    if (11..=15).contains(&len) && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        failure("mobile_number")
    }
}

pub fn iso8601_timestamp(value: &str) -> Result<(), ValidationError> {
    match parse_timestamp(value) {
        Some(_) => Ok(()),
        None => failure("iso8601"),
    }
}

pub fn iso8601_date(value: &str) -> Result<(), ValidationError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => failure("iso8601"),
    }
}

pub fn notice_category(value: &str) -> Result<(), ValidationError> {
    match NoticeCategory::from_str(value) {
        Some(_) => Ok(()),
        None => failure("category"),
    }
}

pub fn gender(value: &str) -> Result<(), ValidationError> {
    match Gender::from_str(value) {
        Some(_) => Ok(()),
        None => failure("gender"),
    }
}

pub fn blood_group(value: &str) -> Result<(), ValidationError> {
    match BloodGroup::from_str(value) {
        Some(_) => Ok(()),
        None => failure("blood_group"),
    }
}

pub fn admin_role(value: &str) -> Result<(), ValidationError> {
    match AdminRole::from_str(value) {
        Some(_) => Ok(()),
        None => failure("role"),
    }
}

/// Accepts a full RFC 3339 timestamp, a zone-less date-time (read as UTC),
/// or a bare calendar date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    parse_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_username_chars() {
        assert!(username_chars("karate_admin01").is_ok());
        assert!(username_chars("karate-admin").is_err());
        assert!(username_chars("space here").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(password_strength("Secret1").is_ok());
        assert!(password_strength("secret1").is_err());
        assert!(password_strength("SECRET1").is_err());
        assert!(password_strength("SecretOne").is_err());
    }

    #[test]
    fn test_skb_id_chars() {
        assert!(skb_id_chars("ABC123").is_ok());
        assert!(skb_id_chars("abc123").is_err());
        assert!(skb_id_chars("ABC-123").is_err());
    }

    #[test]
    fn test_letters_and_spaces() {
        assert!(letters_and_spaces("Fatima Rahman").is_ok());
        assert!(letters_and_spaces("R2D2").is_err());
        assert!(letters_and_spaces("O'Neil").is_err());
    }

    #[test]
    fn test_mobile_number() {
        assert!(mobile_number("01712345678").is_ok());
        assert!(mobile_number("0171234567").is_err());
        assert!(mobile_number("+8801712345678").is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let full = parse_timestamp("2025-03-01T10:30:00+06:00").unwrap();
        assert_eq!(full.hour(), 4);

        let naive = parse_timestamp("2025-03-01T10:30:00").unwrap();
        assert_eq!(naive.hour(), 10);

        let date_only = parse_timestamp("2025-03-01").unwrap();
        assert_eq!(date_only.day(), 1);
        assert_eq!(date_only.hour(), 0);

        assert!(parse_timestamp("01/03/2025").is_none());
        assert!(parse_timestamp("2025-02-30").is_none());
    }

    #[test]
    fn test_enum_membership() {
        assert!(notice_category("tournament").is_ok());
        assert!(notice_category("all").is_err());
        assert!(gender("other").is_ok());
        assert!(gender("unknown").is_err());
        assert!(blood_group("AB-").is_ok());
        assert!(blood_group("AB").is_err());
        assert!(admin_role("super-admin").is_ok());
        assert!(admin_role("root").is_err());
    }
}
