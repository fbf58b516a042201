pub mod cache;
pub mod lifecycle;
pub mod raw;
pub mod resources;

#[cfg(test)]
mod tests;

pub use autoriza_shared as shared;

use autoriza_shared::{
    authorization::{Status, Transition},
    validate::FieldError,
};
use parking_lot::RwLock;
use reqwest::StatusCode;
use std::{path::Path, sync::Arc};

/// Connection to the backend, shared by every request.
pub struct Context {
    req_client: reqwest::Client,
    url_prefix: String,
    /// Access token attached as bearer authentication while present.
    token: RwLock<Option<String>>,
}

impl Context {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url_prefix)
    }

    pub fn with_client(req_client: reqwest::Client, url_prefix: impl Into<String>) -> Self {
        Self {
            req_client,
            url_prefix: url_prefix.into().trim_end_matches('/').to_owned(),
            token: RwLock::new(None),
        }
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("request failed with {status}{}", detail_suffix(.detail))]
    Request {
        status: StatusCode,
        /// Human-readable `detail` from the error body, if any.
        detail: Option<String>,
    },
    #[error("transport error: {0}")]
    Transport(Arc<reqwest::Error>),
    #[error("authorization {id} is {} and cannot be {}", .status.label(), transition_label(.transition))]
    InvalidTransition {
        id: u64,
        status: Status,
        transition: Transition,
    },
    #[error("authorization {0} not found")]
    UnknownAuthorization(u64),
    #[error("operation already in progress")]
    Pending,
    #[error("file unavailable")]
    FileUnavailable,
    #[error("io error: {0}")]
    Io(Arc<std::io::Error>),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

fn transition_label(transition: &Transition) -> &'static str {
    match transition {
        Transition::Submit => "submitted",
        Transition::Approve => "approved",
        Transition::Reject => "rejected",
    }
}

impl Error {
    /// Converts this error into the message shown to the user.
    ///
    /// `fallback` is used for request errors the backend sent no detail for.
    pub fn notification(&self, fallback: &str) -> String {
        match self {
            Error::Validation(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            Error::Request {
                detail: Some(detail),
                ..
            } => detail.to_owned(),
            Error::Request { detail: None, .. } => fallback.to_owned(),
            Error::Transport(_) => "action failed".to_owned(),
            Error::FileUnavailable | Error::Io(_) => "file unavailable".to_owned(),
            other => other.to_string(),
        }
    }

    /// Whether the backend refused the session credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Request { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// The field errors, if this is a validation error.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<Vec<FieldError>> for Error {
    #[inline]
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<FieldError> for Error {
    #[inline]
    fn from(error: FieldError) -> Self {
        Self::Validation(vec![error])
    }
}

/// Implements `From<T>` for [`Error`] through an `Arc`.
macro_rules! impl_from {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl From<$t> for $crate::Error {
                #[inline]
                fn from(err: $t) -> Self {
                    Self::$v(Arc::new(err))
                }
            }
        )*
    };
}

impl_from! {
    reqwest::Error => Transport,
    std::io::Error => Io,
}

/// A file picked by the user for upload.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: bytes::Bytes,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<bytes::Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            content_type: guess_mime(&file_name),
            file_name,
            bytes: bytes.into(),
        }
    }

    /// Reads a local file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "arquivo".to_owned());

        Ok(Self::new(file_name, bytes))
    }

    fn to_part(&self) -> Result<reqwest::multipart::Part, Error> {
        Ok(reqwest::multipart::Part::stream(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.content_type.as_ref())?)
    }
}

fn guess_mime(file_name: &str) -> mime::Mime {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => mime::APPLICATION_PDF,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
