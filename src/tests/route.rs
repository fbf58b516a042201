use autoriza_shared::account::Role;

use crate::{
    route::{navigate, resolve, Access, Resolution, Route},
    session::{SessionState, SessionUser},
};

fn state(role: Option<Role>) -> SessionState {
    SessionState {
        user: role.map(|role| SessionUser {
            email: "prof@example.com".to_owned(),
            role,
        }),
    }
}

#[test]
fn parse_paths() {
    assert_eq!(Route::parse("/"), Some(Route::Root));
    assert_eq!(Route::parse("/eventos"), Some(Route::PublicEvents));
    assert_eq!(
        Route::parse("/evento/publico/abc123"),
        Some(Route::PublicEvent("abc123".to_owned()))
    );
    assert_eq!(
        Route::parse("/evento/abc123"),
        Some(Route::Registration("abc123".to_owned()))
    );
    assert_eq!(
        Route::parse("/evento/detalhes/7"),
        Some(Route::EventDetails(7))
    );
    assert_eq!(
        Route::parse("/evento/chamada/7?data=2025-03-11"),
        Some(Route::Attendance(7))
    );
    assert_eq!(Route::parse("/admin/campus/"), Some(Route::Campuses));
    assert_eq!(Route::parse("/evento/detalhes/sete"), None);
    assert_eq!(Route::parse("/nada"), None);

    for route in [
        Route::Login,
        Route::Dashboard,
        Route::Users,
        Route::Attendance(3),
        Route::PublicEvent("x".to_owned()),
    ] {
        assert_eq!(Route::parse(&route.path()), Some(route));
    }
}

#[test]
fn policy() {
    assert_eq!(Route::RecoverPassword.access(), Access::Public);
    assert_eq!(Route::Registration("x".to_owned()).access(), Access::Public);
    assert_eq!(Route::Attendance(1).access(), Access::Authenticated);
    assert_eq!(Route::Campuses.access(), Access::Admin);
}

#[test]
fn unauthenticated() {
    let anonymous = state(None);

    assert_eq!(
        resolve(Route::PublicEvents, &anonymous),
        Resolution::Allow(Route::PublicEvents)
    );
    assert_eq!(
        resolve(Route::Dashboard, &anonymous),
        Resolution::Redirect(Route::Login)
    );
    assert_eq!(
        resolve(Route::Users, &anonymous),
        Resolution::Redirect(Route::Login)
    );
    assert_eq!(navigate("/", &anonymous), Route::PublicEvents);
    assert_eq!(navigate("/evento/chamada/2", &anonymous), Route::Login);
}

#[test]
fn professor() {
    let professor = state(Some(Role::Professor));

    assert_eq!(
        resolve(Route::EventDetails(7), &professor),
        Resolution::Allow(Route::EventDetails(7))
    );
    assert_eq!(
        resolve(Route::Campuses, &professor),
        Resolution::Redirect(Route::Dashboard)
    );
    assert_eq!(navigate("/", &professor), Route::Dashboard);
    assert_eq!(navigate("/admin/usuarios", &professor), Route::Dashboard);
    assert_eq!(navigate("/desconhecido", &professor), Route::Dashboard);
}

#[test]
fn admin() {
    let admin = state(Some(Role::Admin));

    assert_eq!(navigate("/admin/usuarios", &admin), Route::Users);
    assert_eq!(navigate("/admin/campus", &admin), Route::Campuses);
    assert_eq!(navigate("/login", &admin), Route::Login);
}
