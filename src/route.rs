//! Route access policy.

use std::fmt::Display;

use crate::session::SessionState;

/// A screen of the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, which only ever redirects.
    Root,

    PublicEvents,
    PublicEvent(
        /// Unique link
        String,
    ),
    /// Self-registration form of an event, by unique link.
    Registration(String),
    Login,
    RegisterProfessor,
    RecoverPassword,
    VerifyCode,
    SetPassword,

    Dashboard,
    EventDetails(u64),
    Attendance(u64),

    Users,
    Campuses,
}

/// Who may reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// Outcome of resolving a route against the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Allow(Route),
    Redirect(Route),
}

impl Route {
    /// Minimum access required to reach this route.
    pub fn access(&self) -> Access {
        match self {
            Route::Root
            | Route::PublicEvents
            | Route::PublicEvent(_)
            | Route::Registration(_)
            | Route::Login
            | Route::RegisterProfessor
            | Route::RecoverPassword
            | Route::VerifyCode
            | Route::SetPassword => Access::Public,
            Route::Dashboard | Route::EventDetails(_) | Route::Attendance(_) => {
                Access::Authenticated
            }
            Route::Users | Route::Campuses => Access::Admin,
        }
    }

    /// Parses a path, `None` if no route matches it.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        Some(match segments.as_slice() {
            [] => Route::Root,
            ["eventos"] => Route::PublicEvents,
            ["evento", "publico", link] => Route::PublicEvent((*link).to_owned()),
            ["evento", "detalhes", id] => Route::EventDetails(id.parse().ok()?),
            ["evento", "chamada", id] => Route::Attendance(id.parse().ok()?),
            ["evento", link] => Route::Registration((*link).to_owned()),
            ["login"] => Route::Login,
            ["cadastro-professor"] => Route::RegisterProfessor,
            ["recuperar-senha"] => Route::RecoverPassword,
            ["verificar-codigo"] => Route::VerifyCode,
            ["definir-senha"] => Route::SetPassword,
            ["dashboard"] => Route::Dashboard,
            ["admin", "usuarios"] => Route::Users,
            ["admin", "campus"] => Route::Campuses,
            _ => return None,
        })
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_owned(),
            Route::PublicEvents => "/eventos".to_owned(),
            Route::PublicEvent(link) => format!("/evento/publico/{link}"),
            Route::Registration(link) => format!("/evento/{link}"),
            Route::Login => "/login".to_owned(),
            Route::RegisterProfessor => "/cadastro-professor".to_owned(),
            Route::RecoverPassword => "/recuperar-senha".to_owned(),
            Route::VerifyCode => "/verificar-codigo".to_owned(),
            Route::SetPassword => "/definir-senha".to_owned(),
            Route::Dashboard => "/dashboard".to_owned(),
            Route::EventDetails(id) => format!("/evento/detalhes/{id}"),
            Route::Attendance(id) => format!("/evento/chamada/{id}"),
            Route::Users => "/admin/usuarios".to_owned(),
            Route::Campuses => "/admin/campus".to_owned(),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolves one step of navigation to `route`.
pub fn resolve(route: Route, state: &SessionState) -> Resolution {
    if route == Route::Root {
        return Resolution::Redirect(if state.is_authenticated() {
            Route::Dashboard
        } else {
            Route::PublicEvents
        });
    }

    match route.access() {
        Access::Public => Resolution::Allow(route),
        _ if !state.is_authenticated() => Resolution::Redirect(Route::Login),
        Access::Admin if !state.is_admin() => Resolution::Redirect(Route::Dashboard),
        _ => Resolution::Allow(route),
    }
}

/// Navigates to `path`, following redirects to the route finally shown.
///
/// Unknown paths lead to `/`.
pub fn navigate(path: &str, state: &SessionState) -> Route {
    let mut route = Route::parse(path).unwrap_or_else(|| {
        tracing::debug!("no route for {path}");
        Route::Root
    });

    loop {
        match resolve(route, state) {
            Resolution::Allow(route) => return route,
            Resolution::Redirect(target) => {
                tracing::debug!("redirected to {target}");
                route = target;
            }
        }
    }
}
