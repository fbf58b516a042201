pub mod handle;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Describes status of an authorization.
///
/// ```text
/// pre-registered --submit--> submitted --approve--> approved
///                               ^       \--reject---> rejected
/// (self-registration) ----------+
/// ```
///
/// `approved` and `rejected` are terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Placeholder created by staff, waiting for the signed document.
    #[serde(rename = "pré-cadastrado")]
    Preregistered,
    /// The signed document was uploaded and waits for review.
    #[serde(rename = "submetido")]
    Submitted,
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "rejeitado")]
    Rejected,
}

/// An action moving an authorization between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Submit,
    Approve,
    Reject,
}

impl Status {
    /// Returns the status reached by applying `transition`, or `None` if the
    /// transition is not allowed from this status.
    pub fn apply(self, transition: Transition) -> Option<Status> {
        match (self, transition) {
            (Status::Preregistered, Transition::Submit) => Some(Status::Submitted),
            (Status::Submitted, Transition::Approve) => Some(Status::Approved),
            (Status::Submitted, Transition::Reject) => Some(Status::Rejected),
            _ => None,
        }
    }

    /// Whether staff may approve or reject from this status.
    pub fn reviewable(&self) -> bool {
        matches!(self, Status::Submitted)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Approved | Status::Rejected)
    }

    /// Whether a record in this status must carry a file.
    pub fn requires_file(&self) -> bool {
        !matches!(self, Status::Preregistered)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Preregistered => "pre-registered",
            Status::Submitted => "submitted",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }
}

/// A student's permission-slip record for one event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Authorization {
    pub id: u64,
    #[serde(rename = "evento_id")]
    pub event_id: u64,
    #[serde(rename = "nome_aluno")]
    pub student_name: String,
    #[serde(rename = "matricula_aluno", default)]
    pub student_registration: Option<String>,
    #[serde(rename = "email_aluno", default)]
    pub student_email: Option<String>,
    #[serde(rename = "nome_responsavel", default)]
    pub guardian_name: Option<String>,
    #[serde(rename = "email_responsavel", default)]
    pub guardian_email: Option<String>,
    /// Server-side reference of the signed document.
    #[serde(rename = "caminho_arquivo", default)]
    pub file_path: Option<String>,
    #[serde(rename = "nome_arquivo_original", default)]
    pub original_file_name: Option<String>,
    pub status: Status,
    #[serde(rename = "motivo_rejeicao", default)]
    pub rejection_reason: Option<String>,
    #[serde(rename = "presencas", default)]
    pub presences: Vec<Presence>,
}

impl Authorization {
    /// The presence recorded on `date`, both flags cleared if none was yet.
    pub fn presence_on(&self, date: NaiveDate) -> Presence {
        self.presences
            .iter()
            .find(|p| p.date == date)
            .cloned()
            .unwrap_or_else(|| Presence::absent(date))
    }

    /// Replaces the presence of the same date, or appends it.
    pub fn upsert_presence(&mut self, presence: Presence) {
        match self.presences.iter_mut().find(|p| p.date == presence.date) {
            Some(existing) => *existing = presence,
            None => self.presences.push(presence),
        }
    }

    /// Whether this record carries a file where its status requires one.
    pub fn has_required_file(&self) -> bool {
        !self.status.requires_file() || self.file_path.is_some()
    }

    /// The file name offered when saving the attachment locally.
    pub fn download_name(&self) -> String {
        self.original_file_name
            .clone()
            .unwrap_or_else(|| format!("autorizacao_{}.pdf", self.student_name))
    }
}

/// Attendance of one authorization on one day.
///
/// `return_trip` is only ever true while `outbound` is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    #[serde(rename = "data_presenca")]
    pub date: NaiveDate,
    #[serde(rename = "presente_ida", default)]
    pub outbound: bool,
    #[serde(rename = "presente_volta", default)]
    pub return_trip: bool,
}

impl Presence {
    pub fn absent(date: NaiveDate) -> Self {
        Self {
            date,
            outbound: false,
            return_trip: false,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.outbound || !self.return_trip
    }
}

/// Keeps the authorizations attendance is taken for.
pub fn approved(authorizations: &[Authorization]) -> impl Iterator<Item = &Authorization> {
    authorizations
        .iter()
        .filter(|auth| auth.status == Status::Approved)
}
