pub mod handle;

use serde::{Deserialize, Serialize};

/// Represents roles of a staff account.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates and manages events.
    Professor,
    /// Manages users and campuses on top of what a professor does.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Professor => "professor",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professor" => Ok(Role::Professor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role \"{other}\"")),
        }
    }
}

/// Represents a staff account as listed by the user administration endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: Role,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub campus_id: Option<u64>,
}

fn default_active() -> bool {
    true
}

/// Claims carried by the access token issued by `/auth/token`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject, the email of the account.
    pub sub: String,
    #[serde(rename = "tipo")]
    pub role: Role,
    /// Expiry as seconds since the unix epoch.
    pub exp: i64,
}
