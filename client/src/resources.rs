use autoriza_shared::{
    account::{
        handle::{
            CodeFlow, RegisterDescriptor, RequestCodeDescriptor, SetPasswordDescriptor,
            UserDescriptor, VerifyCodeDescriptor,
        },
        User,
    },
    authorization::Authorization,
    campus::{Campus, CampusDescriptor},
    event::{handle::EventDescriptor, Event},
    validate::Validate,
};
use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    raw::{self, call},
    Context, Error,
};

/// Server resources read through the [`Cache`].
///
/// Every mutation validates its input, calls the backend and then invalidates
/// the keys whose data it changes.
pub struct Resources {
    cx: Arc<Context>,
    cache: Arc<Cache>,
}

impl Resources {
    pub fn new(cx: Arc<Context>, cache: Arc<Cache>) -> Self {
        Self { cx, cache }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.cx
    }

    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    // events

    pub async fn events(&self) -> Result<Arc<Vec<Event>>, Error> {
        self.cache
            .get(&CacheKey::Events, || call(raw::event::List, &self.cx))
            .await
    }

    pub async fn event(&self, id: u64) -> Result<Arc<Event>, Error> {
        self.cache
            .get(&CacheKey::Event(id), || call(raw::event::View { id }, &self.cx))
            .await
    }

    pub async fn public_events(&self, campus_id: Option<u64>) -> Result<Arc<Vec<Event>>, Error> {
        self.cache
            .get(&CacheKey::PublicEvents(campus_id), || {
                call(raw::event::ListPublic { campus_id }, &self.cx)
            })
            .await
    }

    pub async fn public_event(&self, link: &str) -> Result<Arc<Event>, Error> {
        self.cache
            .get(&CacheKey::PublicEvent(link.to_owned()), || {
                call(
                    raw::event::ViewPublic {
                        link: link.to_owned(),
                    },
                    &self.cx,
                )
            })
            .await
    }

    pub async fn create_event(&self, descriptor: EventDescriptor) -> Result<Event, Error> {
        descriptor.validate()?;
        let event = call(raw::event::Create { descriptor }, &self.cx).await?;
        tracing::info!("event {} created", event.id);

        self.cache.invalidate_where(|key| {
            matches!(key, CacheKey::Events | CacheKey::PublicEvents(_))
        });
        Ok(event)
    }

    pub async fn update_event(&self, id: u64, descriptor: EventDescriptor) -> Result<Event, Error> {
        descriptor.validate()?;
        let event = call(raw::event::Update { id, descriptor }, &self.cx).await?;
        tracing::info!("event {id} updated");

        self.cache.invalidate_where(|key| {
            matches!(
                key,
                CacheKey::Events | CacheKey::PublicEvents(_) | CacheKey::PublicEvent(_)
            ) || *key == CacheKey::Event(id)
        });
        Ok(event)
    }

    /// Deletes an event together with its authorizations.
    pub async fn delete_event(&self, id: u64) -> Result<(), Error> {
        call(raw::event::Delete { id }, &self.cx).await?;
        tracing::info!("event {id} deleted");

        self.cache.invalidate_where(|key| key.concerns_event(id));
        Ok(())
    }

    /// The printable permission-slip template of an event.
    pub async fn event_template(&self, id: u64) -> Result<bytes::Bytes, Error> {
        call(raw::event::Template { id }, &self.cx).await
    }

    // authorizations

    pub async fn authorizations(&self, event_id: u64) -> Result<Arc<Vec<Authorization>>, Error> {
        self.cache
            .get(&CacheKey::Authorizations(event_id), || {
                call(raw::authorization::List { event_id }, &self.cx)
            })
            .await
    }

    pub async fn preregistered(&self, event_id: u64) -> Result<Arc<Vec<Authorization>>, Error> {
        self.cache
            .get(&CacheKey::Preregistered(event_id), || {
                call(raw::authorization::ListPreregistered { event_id }, &self.cx)
            })
            .await
    }

    /// Marks every authorization listing of an event stale, and the event
    /// listings that carry its authorization count.
    pub fn invalidate_authorizations(&self, event_id: u64) {
        self.cache.invalidate_where(|key| {
            matches!(key, CacheKey::Events)
                || *key == CacheKey::Event(event_id)
                || *key == CacheKey::Authorizations(event_id)
                || *key == CacheKey::Preregistered(event_id)
        });
    }

    // campuses

    pub async fn campuses(&self) -> Result<Arc<Vec<Campus>>, Error> {
        self.cache
            .get(&CacheKey::Campuses, || call(raw::campus::List, &self.cx))
            .await
    }

    pub async fn create_campus(&self, descriptor: CampusDescriptor) -> Result<Campus, Error> {
        descriptor.validate()?;
        let campus = call(raw::campus::Create { descriptor }, &self.cx).await?;
        tracing::info!("campus {} created", campus.id);

        self.cache.invalidate(&CacheKey::Campuses);
        Ok(campus)
    }

    pub async fn update_campus(
        &self,
        id: u64,
        descriptor: CampusDescriptor,
    ) -> Result<Campus, Error> {
        descriptor.validate()?;
        let campus = call(raw::campus::Update { id, descriptor }, &self.cx).await?;
        tracing::info!("campus {id} updated");

        self.cache.invalidate(&CacheKey::Campuses);
        Ok(campus)
    }

    pub async fn delete_campus(&self, id: u64) -> Result<(), Error> {
        call(raw::campus::Delete { id }, &self.cx).await?;
        tracing::info!("campus {id} deleted");

        self.cache.invalidate_where(|key| {
            matches!(key, CacheKey::Campuses)
                || *key == CacheKey::PublicEvents(Some(id))
        });
        Ok(())
    }

    // users

    pub async fn users(&self) -> Result<Arc<Vec<User>>, Error> {
        self.cache
            .get(&CacheKey::Users, || call(raw::user::List, &self.cx))
            .await
    }

    pub async fn create_user(&self, descriptor: UserDescriptor) -> Result<User, Error> {
        descriptor.validate_create()?;
        let user = call(raw::user::Create { descriptor }, &self.cx).await?;
        tracing::info!("user {} created", user.id);

        self.cache.invalidate(&CacheKey::Users);
        Ok(user)
    }

    pub async fn update_user(&self, id: u64, descriptor: UserDescriptor) -> Result<User, Error> {
        descriptor.validate()?;
        let user = call(raw::user::Update { id, descriptor }, &self.cx).await?;
        tracing::info!("user {id} updated");

        self.cache.invalidate(&CacheKey::Users);
        Ok(user)
    }

    /// Deletes a user, the backend deletes the events they own with them.
    pub async fn delete_user(&self, id: u64) -> Result<(), Error> {
        call(raw::user::Delete { id }, &self.cx).await?;
        tracing::info!("user {id} deleted");

        self.cache.invalidate_where(|key| {
            !matches!(key, CacheKey::Campuses)
        });
        Ok(())
    }

    // registration and recovery

    pub async fn register(&self, descriptor: RegisterDescriptor) -> Result<(), Error> {
        descriptor.validate()?;
        call(raw::auth::Register { descriptor }, &self.cx).await
    }

    /// Requests a verification code; resending for a password reset sends no
    /// name.
    pub async fn request_code(&self, email: &str, flow: CodeFlow) -> Result<(), Error> {
        RequestCodeDescriptor {
            email: email.to_owned(),
            name: None,
        }
        .validate()?;

        call(
            raw::auth::RequestCode {
                email: email.to_owned(),
                flow,
            },
            &self.cx,
        )
        .await
    }

    pub async fn verify_code(&self, descriptor: VerifyCodeDescriptor) -> Result<(), Error> {
        descriptor.validate()?;
        call(raw::auth::VerifyCode { descriptor }, &self.cx).await
    }

    pub async fn set_password(&self, descriptor: SetPasswordDescriptor) -> Result<(), Error> {
        descriptor.validate()?;
        call(raw::auth::SetPassword { descriptor }, &self.cx).await
    }
}
