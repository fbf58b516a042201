use std::fmt::Display;

/// A validation failure bound to an input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Input that must be checked locally before it is sent to the backend.
pub trait Validate {
    /// Collects every field error of this input.
    fn field_errors(&self) -> Vec<FieldError>;

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Pushes an error if `value` is blank.
pub fn required(errors: &mut Vec<FieldError>, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

/// Pushes an error if `value` is not a valid email address.
///
/// Blank values are reported as missing.
pub fn email(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "email is required"));
    } else if value.trim().parse::<lettre::Address>().is_err() {
        errors.push(FieldError::new(field, "invalid email"));
    }
}

/// Pushes an error if the character count of `value` is outside `min..=max`.
pub fn length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.trim().chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    } else if len > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn password(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            field,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

/// Turns a blank optional input into `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
