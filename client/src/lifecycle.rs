//! Status transitions and attendance of authorizations.

use autoriza_shared::{
    authorization::{
        handle::{
            PreregisterDescriptor, PresenceUpdate, Review, SelfRegisterDescriptor,
            SubmissionDescriptor,
        },
        Authorization, Presence, Status,
    },
    validate::{non_blank, FieldError, Validate},
};
use chrono::NaiveDate;
use dashmap::DashSet;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    cache::CacheKey,
    raw::{self, call},
    resources::Resources,
    Attachment, Error,
};

/// A user-triggered operation that may be in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Preregister(
        /// Event id
        u64,
    ),
    SelfRegister(
        /// Event id
        u64,
    ),
    Submit(u64),
    Review(u64),
    Presence(u64, NaiveDate),
    Download(u64),
}

/// Operations currently in flight.
///
/// An operation can't be started twice at once, which keeps a double click
/// from submitting twice.
#[derive(Default)]
pub struct Pending {
    operations: DashSet<Operation>,
}

impl Pending {
    /// Marks `operation` as in flight until the returned guard drops.
    pub fn begin(&self, operation: Operation) -> Result<PendingGuard<'_>, Error> {
        if !self.operations.insert(operation.clone()) {
            return Err(Error::Pending);
        }

        Ok(PendingGuard {
            pending: self,
            operation,
        })
    }

    pub fn is_pending(&self, operation: &Operation) -> bool {
        self.operations.contains(operation)
    }
}

pub struct PendingGuard<'a> {
    pending: &'a Pending,
    operation: Operation,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.operations.remove(&self.operation);
    }
}

/// Drives authorizations through their status machine and records attendance.
pub struct Lifecycle {
    resources: Arc<Resources>,
    pending: Pending,
}

impl Lifecycle {
    pub fn new(resources: Arc<Resources>) -> Self {
        Self {
            resources,
            pending: Pending::default(),
        }
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    pub fn is_pending(&self, operation: &Operation) -> bool {
        self.pending.is_pending(operation)
    }

    /// Every authorization of an event, for staff.
    pub async fn authorizations(&self, event_id: u64) -> Result<Arc<Vec<Authorization>>, Error> {
        self.resources.authorizations(event_id).await
    }

    /// Pre-registered students of an event, for the public submission form.
    pub async fn preregistered(&self, event_id: u64) -> Result<Arc<Vec<Authorization>>, Error> {
        self.resources.preregistered(event_id).await
    }

    /// Approved authorizations of an event, the ones attendance is taken for.
    pub async fn attendance_list(&self, event_id: u64) -> Result<Vec<Authorization>, Error> {
        Ok(
            autoriza_shared::authorization::approved(&self.authorizations(event_id).await?)
                .cloned()
                .collect(),
        )
    }

    /// Looks up the current state of an authorization in its event's list.
    pub async fn find(&self, event_id: u64, id: u64) -> Result<Authorization, Error> {
        self.authorizations(event_id)
            .await?
            .iter()
            .find(|auth| auth.id == id)
            .cloned()
            .ok_or(Error::UnknownAuthorization(id))
    }

    /// Creates a placeholder authorization in `pre-registered` status.
    pub async fn preregister(
        &self,
        event_id: u64,
        student_name: &str,
        student_registration: Option<String>,
    ) -> Result<Authorization, Error> {
        let descriptor = PreregisterDescriptor {
            student_name: student_name.trim().to_owned(),
            student_registration: non_blank(student_registration),
        };
        descriptor.validate()?;

        let _guard = self.pending.begin(Operation::Preregister(event_id))?;
        let auth = call(
            raw::authorization::Preregister {
                event_id,
                descriptor,
            },
            self.resources.context(),
        )
        .await?;

        tracing::info!("authorization {} pre-registered for event {event_id}", auth.id);
        self.resources.invalidate_authorizations(event_id);
        Ok(auth)
    }

    /// Registers a participant and submits their signed document at once.
    ///
    /// The record enters directly in `submitted` status.
    pub async fn self_register(
        &self,
        event_id: u64,
        descriptor: SelfRegisterDescriptor,
        file: Option<Attachment>,
    ) -> Result<Authorization, Error> {
        let file = validate_with_file(&descriptor, file)?;

        let _guard = self.pending.begin(Operation::SelfRegister(event_id))?;
        let auth = call(
            raw::authorization::SelfRegister {
                event_id,
                descriptor,
                file,
            },
            self.resources.context(),
        )
        .await?;

        tracing::info!("authorization {} self-registered for event {event_id}", auth.id);
        self.resources.invalidate_authorizations(event_id);
        Ok(auth)
    }

    /// Submits the signed document of a `pre-registered` authorization.
    ///
    /// The backend rejects records in any other status.
    pub async fn submit_existing(
        &self,
        id: u64,
        descriptor: SubmissionDescriptor,
        file: Option<Attachment>,
    ) -> Result<Authorization, Error> {
        let file = validate_with_file(&descriptor, file)?;

        let _guard = self.pending.begin(Operation::Submit(id))?;
        let auth = call(
            raw::authorization::Submit {
                id,
                descriptor,
                file,
            },
            self.resources.context(),
        )
        .await?;

        tracing::info!("authorization {id} submitted");
        self.resources.invalidate_authorizations(auth.event_id);
        Ok(auth)
    }

    /// Whether a review of the authorization can be started now.
    pub async fn can_review(&self, event_id: u64, id: u64) -> bool {
        !self.pending.is_pending(&Operation::Review(id))
            && matches!(self.find(event_id, id).await, Ok(auth) if auth.status.reviewable())
    }

    pub async fn approve(&self, event_id: u64, id: u64) -> Result<Authorization, Error> {
        self.review(event_id, id, Review::Approve).await
    }

    /// Rejects a submitted authorization; `reason` is mailed to the guardian.
    pub async fn reject(
        &self,
        event_id: u64,
        id: u64,
        reason: &str,
    ) -> Result<Authorization, Error> {
        self.review(event_id, id, Review::Reject(reason.to_owned()))
            .await
    }

    /// Applies a staff review to a `submitted` authorization of an event.
    pub async fn review(
        &self,
        event_id: u64,
        id: u64,
        review: Review,
    ) -> Result<Authorization, Error> {
        review.validate()?;

        let current = self.find(event_id, id).await?;
        let transition = review.transition();
        if current.status.apply(transition).is_none() {
            return Err(Error::InvalidTransition {
                id,
                status: current.status,
                transition,
            });
        }

        let _guard = self.pending.begin(Operation::Review(id))?;
        let auth = call(
            raw::authorization::SetStatus {
                id,
                descriptor: review.descriptor(),
            },
            self.resources.context(),
        )
        .await?;

        tracing::info!("authorization {id} {}", auth.status.label());
        self.resources
            .cache()
            .invalidate(&CacheKey::Authorizations(current.event_id));
        self.resources
            .cache()
            .invalidate(&CacheKey::Preregistered(current.event_id));
        Ok(auth)
    }

    /// Records attendance of an authorization on `date`.
    ///
    /// Clearing outbound presence clears return presence in the same call,
    /// and return presence without outbound presence is refused before
    /// reaching the backend. The cached authorization list is patched with
    /// the server's response instead of being refetched.
    pub async fn set_presence(
        &self,
        event_id: u64,
        id: u64,
        date: NaiveDate,
        update: PresenceUpdate,
    ) -> Result<Presence, Error> {
        let current = self.find(event_id, id).await?;
        let update = update.normalize(&current.presence_on(date))?;

        let _guard = self.pending.begin(Operation::Presence(id, date))?;
        let presence = call(
            raw::authorization::SetPresence { id, date, update },
            self.resources.context(),
        )
        .await?;

        tracing::info!(
            "authorization {id} presence on {date}: outbound {}, return {}",
            presence.outbound,
            presence.return_trip
        );

        let key = CacheKey::Authorizations(current.event_id);
        let patched = self
            .resources
            .cache()
            .update(&key, |list: &mut Vec<Authorization>| {
                match list.iter_mut().find(|auth| auth.id == id) {
                    Some(auth) => {
                        auth.upsert_presence(presence.clone());
                        true
                    }
                    None => false,
                }
            })
            .await;
        if !patched {
            self.resources.cache().invalidate(&key);
        }

        Ok(presence)
    }

    /// Downloads the signed document of an authorization into `dir`.
    ///
    /// The request carries the session, so the file is fetched here and
    /// saved locally rather than handed out as a link.
    pub async fn download_file(
        &self,
        event_id: u64,
        id: u64,
        dir: &Path,
    ) -> Result<PathBuf, Error> {
        let _guard = self.pending.begin(Operation::Download(id))?;

        let download = call(raw::authorization::File { id }, self.resources.context())
            .await
            .map_err(|err| {
                tracing::warn!("downloading file of authorization {id} failed: {err}");
                Error::FileUnavailable
            })?;

        let file_name = match download.file_name {
            Some(name) => name,
            None => match self.find(event_id, id).await {
                Ok(auth) => auth.download_name(),
                Err(_) => format!("autorizacao_{id}.pdf"),
            },
        };

        let path = dir.join(sanitize_file_name(&file_name));
        let saved = match tokio::fs::create_dir_all(dir).await {
            Ok(()) => tokio::fs::write(&path, &download.bytes).await,
            Err(err) => Err(err),
        };
        saved.map_err(|err| {
            tracing::warn!("saving {} failed: {err}", path.display());
            Error::FileUnavailable
        })?;

        tracing::info!("authorization {id} file saved to {}", path.display());
        Ok(path)
    }
}

/// Validates a submission form including its file, before any request.
fn validate_with_file<D: Validate>(
    descriptor: &D,
    file: Option<Attachment>,
) -> Result<Attachment, Error> {
    let mut errors = descriptor.field_errors();
    if file.is_none() {
        errors.push(FieldError::new(
            "file",
            "the signed authorization file is required",
        ));
    }

    match file {
        Some(file) if errors.is_empty() => Ok(file),
        _ => Err(Error::Validation(errors)),
    }
}

/// Keeps a server-provided name from escaping the download directory.
fn sanitize_file_name(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match name.trim_matches('.') {
        "" => "arquivo".to_owned(),
        _ => name,
    }
}

/// Staff actions offered for a record.
pub fn actions_for(status: Status, has_file: bool) -> Vec<&'static str> {
    let mut actions = Vec::new();
    if status.reviewable() {
        actions.push("approve");
        actions.push("reject");
    }
    if has_file {
        actions.push("download");
    }
    actions
}
