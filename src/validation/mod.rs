//! Request validation at the API boundary.
//!
//! Payloads are plain serde structs with `validator` rules declared on their
//! fields. [`validate`] trims them, runs the declared rules plus any
//! cross-field rules, and either hands the payload back or returns every
//! failure as a `(field, message)` pair.

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, Result};

pub mod payloads;
pub mod rules;

pub use payloads::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub trait Payload: Validate {
    /// Trim whitespace and fold empty optional strings to `None`.
    fn normalize(&mut self);

    /// Rules that look at more than one field.
    fn cross_field_rules(&self, _errors: &mut Vec<FieldError>) {}
}

pub fn validate<T: Payload>(mut payload: T) -> Result<T> {
    payload.normalize();

    let mut errors = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errs) => field_errors(&errs),
    };
    payload.cross_field_rules(&mut errors);

    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(AppError::Validation(errors))
    }
}

fn field_errors(errs: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errs.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = camel_case(&field);
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect()
}

/// `contact_info` -> `contactInfo`, matching the serde names on the wire.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub(crate) fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub(crate) fn trim_optional(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim(inner);
        if inner.is_empty() {
            *value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("title"), "title");
        assert_eq!(camel_case("contact_info"), "contactInfo");
        assert_eq!(camel_case("registration_deadline"), "registrationDeadline");
    }

    #[test]
    fn test_trim_optional() {
        let mut value = Some("   ".to_string());
        trim_optional(&mut value);
        assert_eq!(value, None);

        let mut value = Some("  Dhaka ".to_string());
        trim_optional(&mut value);
        assert_eq!(value.as_deref(), Some("Dhaka"));
    }
}
