use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validate::{self, FieldError, Validate};

/// Creates or edits an event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
    /// Sent as `null` when absent.
    #[serde(rename = "data_fim")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "horario")]
    pub time: Option<String>,
    #[serde(rename = "local_evento")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<u64>,
}

impl EventDescriptor {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_date,
            end_date: None,
            time: None,
            location: None,
            campus_id: None,
        }
    }
}

impl Validate for EventDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title is required"));
        } else {
            validate::length(&mut errors, "title", &self.title, 3, 255);
        }
        if matches!(self.end_date, Some(end) if end < self.start_date) {
            errors.push(FieldError::new(
                "end_date",
                "end date cannot be before the start date",
            ));
        }
        if let Some(ref location) = self.location {
            validate::length(&mut errors, "location", location, 0, 500);
        }
        errors
    }
}
