pub mod account;
pub mod authorization;
pub mod campus;
pub mod event;
pub mod validate;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint of the backend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

/// The `detail` field of an [`ErrorBody`].
///
/// The backend sends either a plain message or, for request validation
/// failures, a list of `{msg}` objects.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorItem {
    pub msg: String,
}

impl ErrorDetail {
    /// Extracts the human-readable message, taking the first item of a list.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorDetail::Message(msg) => Some(msg),
            ErrorDetail::Items(items) => items.first().map(|item| item.msg.as_str()),
        }
    }
}
