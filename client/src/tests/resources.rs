use autoriza_shared::{
    account::{handle::UserDescriptor, Role},
    authorization::Status,
    campus::CampusDescriptor,
    event::handle::EventDescriptor,
};
use chrono::NaiveDate;
use std::sync::Arc;

use super::mock::{self, Backend};
use crate::{
    cache::{Cache, CacheKey},
    resources::Resources,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn setup() -> (Arc<Backend>, Resources) {
    let (backend, cx) = mock::spawn().await;
    cx.set_token(Some("header.payload.signature".to_owned()));
    (backend, Resources::new(cx, Arc::new(Cache::default())))
}

fn professor(email: &str, password: Option<&str>) -> UserDescriptor {
    UserDescriptor {
        name: "Paula Lima".to_owned(),
        email: email.to_owned(),
        password: password.map(str::to_owned),
        role: Role::Professor,
        active: true,
        campus_id: None,
    }
}

#[tokio::test]
async fn update_event_refreshes_event_and_listing() {
    let (backend, resources) = setup().await;
    backend.insert_event(7, "Visita", date("2025-03-10"), None);
    backend.insert_event(8, "Feira", date("2025-04-01"), None);
    resources.events().await.unwrap();
    resources.event(7).await.unwrap();
    resources.event(8).await.unwrap();

    let mut descriptor = EventDescriptor::new("Visita técnica", date("2025-03-10"));
    descriptor.end_date = Some(date("2025-03-11"));
    let event = resources.update_event(7, descriptor).await.unwrap();
    assert_eq!(event.title, "Visita técnica");
    assert_eq!(backend.event(7).unwrap().title, "Visita técnica");

    assert!(!resources.cache().is_fresh(&CacheKey::Events));
    assert!(!resources.cache().is_fresh(&CacheKey::Event(7)));
    assert!(resources.cache().is_fresh(&CacheKey::Event(8)));

    let event = resources.event(7).await.unwrap();
    assert_eq!(event.title, "Visita técnica");
    assert_eq!(event.end_date, Some(date("2025-03-11")));
    assert_eq!(resources.events().await.unwrap()[0].title, "Visita técnica");
    assert_eq!(backend.hits_exact("GET /eventos/"), 2);
    assert_eq!(backend.hits_exact("GET /eventos/7"), 2);

    let invalid = EventDescriptor::new("  ", date("2025-03-10"));
    let err = resources.update_event(7, invalid).await.unwrap_err();
    assert_eq!(err.field_errors()[0].field, "title");
    assert_eq!(backend.hits_of("PUT"), 1);
}

#[tokio::test]
async fn delete_event_drops_its_authorizations() {
    let (backend, resources) = setup().await;
    backend.insert_event(7, "Visita", date("2025-03-10"), None);
    backend.insert_authorization(7, "Ana Silva", Status::Submitted);
    assert_eq!(resources.authorizations(7).await.unwrap().len(), 1);

    resources.delete_event(7).await.unwrap();

    assert!(resources.authorizations(7).await.unwrap().is_empty());
    assert!(resources.events().await.unwrap().is_empty());
    assert_eq!(
        backend.hits_exact("GET /autorizacoes/eventos/7/autorizacoes"),
        2
    );
}

#[tokio::test]
async fn campus_changes_refresh_campuses() {
    let (backend, resources) = setup().await;
    let id = backend.insert_campus("Campus Centro");
    resources.users().await.unwrap();
    assert_eq!(resources.campuses().await.unwrap().len(), 1);

    let err = resources
        .update_campus(id, CampusDescriptor { name: "Ab".to_owned() })
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "name");
    assert_eq!(backend.hits_of("PUT"), 0);

    let campus = resources
        .update_campus(
            id,
            CampusDescriptor {
                name: "Campus Norte".to_owned(),
            },
        )
        .await
        .unwrap();
    assert_eq!(campus.name, "Campus Norte");
    assert_eq!(resources.campuses().await.unwrap()[0].name, "Campus Norte");
    assert_eq!(backend.hits_exact("GET /campus/"), 2);

    resources.delete_campus(id).await.unwrap();
    assert!(backend.campus(id).is_none());
    assert!(resources.campuses().await.unwrap().is_empty());
    assert_eq!(backend.hits_exact("GET /campus/"), 3);

    // Users are unaffected by campus changes.
    assert!(resources.cache().is_fresh(&CacheKey::Users));
}

#[tokio::test]
async fn user_changes_refresh_users() {
    let (backend, resources) = setup().await;
    assert!(resources.users().await.unwrap().is_empty());

    let err = resources
        .create_user(professor("paula@example.com", None))
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "password");
    assert_eq!(backend.hits_of("POST"), 0);

    let user = resources
        .create_user(professor("paula@example.com", Some("segredo123")))
        .await
        .unwrap();
    assert_eq!(resources.users().await.unwrap().len(), 1);

    let mut descriptor = professor("paula@example.com", None);
    descriptor.role = Role::Admin;
    descriptor.active = false;
    let updated = resources.update_user(user.id, descriptor).await.unwrap();
    assert_eq!(updated.role, Role::Admin);
    assert!(!updated.active);

    let users = resources.users().await.unwrap();
    assert_eq!(users[0].role, Role::Admin);
    assert_eq!(backend.hits_exact("GET /usuarios/"), 3);

    let err = resources
        .create_user(professor("paula@example.com", Some("segredo123")))
        .await
        .unwrap_err();
    assert_eq!(err.notification("failed"), "Email já cadastrado");
}

#[tokio::test]
async fn delete_user_refreshes_everything_but_campuses() {
    let (backend, resources) = setup().await;
    backend.insert_event(7, "Visita", date("2025-03-10"), None);
    backend.insert_campus("Campus Centro");
    let user = resources
        .create_user(professor("paula@example.com", Some("segredo123")))
        .await
        .unwrap();
    resources.users().await.unwrap();
    resources.events().await.unwrap();
    resources.campuses().await.unwrap();

    resources.delete_user(user.id).await.unwrap();
    assert!(backend.user(user.id).is_none());

    assert!(!resources.cache().is_fresh(&CacheKey::Users));
    assert!(!resources.cache().is_fresh(&CacheKey::Events));
    assert!(resources.cache().is_fresh(&CacheKey::Campuses));

    assert!(resources.users().await.unwrap().is_empty());
    resources.events().await.unwrap();
    resources.campuses().await.unwrap();
    assert_eq!(backend.hits_exact("GET /eventos/"), 2);
    assert_eq!(backend.hits_exact("GET /campus/"), 1);
}
