use serde::{Deserialize, Serialize};

use crate::validate::{self, FieldError, Validate};

use super::Role;

/// Creates or edits a user from the administration screen.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDescriptor {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    /// Required when creating, `None` keeps the current password when editing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "tipo")]
    pub role: Role,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<u64>,
}

impl UserDescriptor {
    /// Checks this descriptor for user creation, where a password is mandatory.
    pub fn validate_create(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = self.field_errors();
        if self.password.is_none() {
            errors.push(FieldError::new("password", "password is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for UserDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::required(&mut errors, "name", &self.name, "name is required");
        validate::email(&mut errors, "email", &self.email);
        if let Some(ref password) = self.password {
            validate::password(&mut errors, "password", password);
        }
        errors
    }
}

/// Self-registration of a professor account.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterDescriptor {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::required(&mut errors, "name", &self.name, "name is required");
        validate::email(&mut errors, "email", &self.email);
        validate::password(&mut errors, "password", &self.password);
        errors
    }
}

/// Which flow a verification code is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeFlow {
    Register {
        name: String,
    },
    /// Password reset only needs the email.
    ResetPassword,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RequestCodeDescriptor {
    pub email: String,
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Validate for RequestCodeDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::email(&mut errors, "email", &self.email);
        errors
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerifyCodeDescriptor {
    pub email: String,
    #[serde(rename = "codigo")]
    pub code: String,
}

impl Validate for VerifyCodeDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::email(&mut errors, "email", &self.email);
        validate::required(&mut errors, "code", &self.code, "code is required");
        errors
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetPasswordDescriptor {
    pub email: String,
    #[serde(rename = "codigo")]
    pub code: String,
    pub password: String,
    /// Confirmation typed by the user, never sent.
    #[serde(skip)]
    pub confirmation: String,
}

impl Validate for SetPasswordDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::email(&mut errors, "email", &self.email);
        validate::required(&mut errors, "code", &self.code, "code is required");
        validate::password(&mut errors, "password", &self.password);
        if self.password != self.confirmation {
            errors.push(FieldError::new("confirmation", "passwords do not match"));
        }
        errors
    }
}
