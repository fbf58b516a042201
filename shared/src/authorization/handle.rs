use serde::{Deserialize, Serialize};

use crate::validate::{self, FieldError, Validate};

use super::Presence;

/// Staff-created placeholder for a known student.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PreregisterDescriptor {
    #[serde(rename = "nome_aluno")]
    pub student_name: String,
    /// Sent as `null` when blank.
    #[serde(rename = "matricula_aluno")]
    pub student_registration: Option<String>,
}

impl Validate for PreregisterDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::required(
            &mut errors,
            "student_name",
            &self.student_name,
            "student name is required",
        );
        errors
    }
}

/// Contact fields a guardian fills when submitting the signed document.
///
/// These are sent as multipart text fields next to the file.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SubmissionDescriptor {
    #[serde(rename = "email_aluno")]
    pub student_email: String,
    #[serde(rename = "nome_responsavel")]
    pub guardian_name: String,
    #[serde(rename = "email_responsavel")]
    pub guardian_email: String,
}

impl SubmissionDescriptor {
    /// Multipart field names and values.
    pub fn fields(&self) -> [(&'static str, String); 3] {
        [
            ("email_aluno", self.student_email.trim().to_owned()),
            ("nome_responsavel", self.guardian_name.trim().to_owned()),
            ("email_responsavel", self.guardian_email.trim().to_owned()),
        ]
    }
}

impl Validate for SubmissionDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::email(&mut errors, "student_email", &self.student_email);
        validate::required(
            &mut errors,
            "guardian_name",
            &self.guardian_name,
            "guardian name is required",
        );
        validate::email(&mut errors, "guardian_email", &self.guardian_email);
        errors
    }
}

/// A participant registering and submitting in one step.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SelfRegisterDescriptor {
    #[serde(rename = "nome_aluno")]
    pub student_name: String,
    #[serde(rename = "matricula_aluno")]
    pub student_registration: Option<String>,
    #[serde(flatten)]
    pub submission: SubmissionDescriptor,
}

impl SelfRegisterDescriptor {
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("nome_aluno", self.student_name.trim().to_owned())];
        if let Some(registration) = validate::non_blank(self.student_registration.clone()) {
            fields.push(("matricula_aluno", registration));
        }
        fields.extend(self.submission.fields());
        fields
    }
}

impl Validate for SelfRegisterDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate::required(
            &mut errors,
            "student_name",
            &self.student_name,
            "student name is required",
        );
        errors.extend(self.submission.field_errors());
        errors
    }
}

/// A staff review decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Review {
    Approve,
    Reject(
        /// Reason sent to the guardian, must not be empty.
        String,
    ),
}

/// Body of `PATCH /autorizacoes/{id}/status`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusDescriptor {
    pub status: super::Status,
    #[serde(rename = "motivo", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Review {
    pub fn transition(&self) -> super::Transition {
        match self {
            Review::Approve => super::Transition::Approve,
            Review::Reject(_) => super::Transition::Reject,
        }
    }

    pub fn descriptor(&self) -> StatusDescriptor {
        match self {
            Review::Approve => StatusDescriptor {
                status: super::Status::Approved,
                reason: None,
            },
            Review::Reject(reason) => StatusDescriptor {
                status: super::Status::Rejected,
                reason: Some(reason.trim().to_owned()),
            },
        }
    }
}

impl Validate for Review {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Review::Reject(reason) = self {
            validate::required(
                &mut errors,
                "reason",
                reason,
                "a rejection reason is required",
            );
        }
        errors
    }
}

/// A partial change of one day's presence.
///
/// Unset flags are left as they are on the server.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresenceUpdate {
    #[serde(rename = "presente_ida", skip_serializing_if = "Option::is_none")]
    pub outbound: Option<bool>,
    #[serde(rename = "presente_volta", skip_serializing_if = "Option::is_none")]
    pub return_trip: Option<bool>,
}

impl PresenceUpdate {
    pub fn outbound(value: bool) -> Self {
        Self {
            outbound: Some(value),
            return_trip: None,
        }
    }

    pub fn return_trip(value: bool) -> Self {
        Self {
            outbound: None,
            return_trip: Some(value),
        }
    }

    /// Enforces the presence invariant against the `current` record.
    ///
    /// Clearing `outbound` also clears `return_trip`. Setting `return_trip`
    /// while outbound presence is not set is rejected.
    pub fn normalize(self, current: &Presence) -> Result<Self, FieldError> {
        if self.outbound.is_none() && self.return_trip.is_none() {
            return Err(FieldError::new("presence", "nothing to update"));
        }

        if self.outbound == Some(false) {
            return Ok(Self {
                outbound: Some(false),
                return_trip: Some(false),
            });
        }

        if self.return_trip == Some(true) && !self.outbound.unwrap_or(current.outbound) {
            return Err(FieldError::new(
                "return_trip",
                "return presence requires outbound presence on the same day",
            ));
        }

        Ok(self)
    }

    /// Applies this update to `presence`.
    pub fn apply(&self, presence: &mut Presence) {
        if let Some(outbound) = self.outbound {
            presence.outbound = outbound;
        }
        if let Some(return_trip) = self.return_trip {
            presence.return_trip = return_trip;
        }
        if !presence.outbound {
            presence.return_trip = false;
        }
    }
}
