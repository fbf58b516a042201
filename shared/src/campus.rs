use serde::{Deserialize, Serialize};

use crate::validate::{self, FieldError, Validate};

/// A campus events and users are scoped to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Campus {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CampusDescriptor {
    #[serde(rename = "nome")]
    pub name: String,
}

impl Validate for CampusDescriptor {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "campus name is required"));
        } else {
            validate::length(&mut errors, "name", &self.name, 3, 255);
        }
        errors
    }
}
