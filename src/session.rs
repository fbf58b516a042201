use autoriza_client::{raw, Context};
use autoriza_shared::account::{Claims, Role};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::watch;

/// Message shown when a login fails without a backend detail.
pub const LOGIN_FAILED: &str = "Invalid email or password.";

/// Persists the access token between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> std::io::Result<()>;
    fn clear(&self);
}

/// Keeps the token in a file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let token = std::fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_owned())
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => (),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
            Err(err) => tracing::warn!("removing token {} failed: {err}", self.path.display()),
        }
    }
}

/// Keeps the token for the lifetime of the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self.token.lock() = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) {
        *self.token.lock() = None;
    }
}

/// Identity of the logged-in user, from the token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
    pub role: Role,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

/// Reads the claims of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::decode_config(payload, base64::URL_SAFE_NO_PAD).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// The current user and the token authenticating them.
///
/// Expiry is only checked by [`Session::initialize`]: a token expiring while
/// the program runs keeps being used until the next start.
pub struct Session {
    cx: Arc<Context>,
    store: Box<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(cx: Arc<Context>, store: impl TokenStore + 'static) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            cx,
            store: Box::new(store),
            state,
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.cx
    }

    /// Restores the session from the persisted token.
    pub fn initialize(&self) -> SessionState {
        self.initialize_at(Utc::now())
    }

    /// Restores the session as of `now`, clearing a missing, malformed or
    /// expired token.
    pub fn initialize_at(&self, now: DateTime<Utc>) -> SessionState {
        let restored = self.store.load().and_then(|token| {
            let claims = decode_claims(&token)?;
            (claims.exp.saturating_mul(1000) > now.timestamp_millis()).then_some((token, claims))
        });

        match restored {
            Some((token, claims)) => {
                tracing::info!("session restored for {}", claims.sub);
                self.cx.set_token(Some(token));
                self.publish(SessionState {
                    user: Some(claims.into()),
                })
            }
            None => {
                tracing::debug!("no valid persisted token");
                self.store.clear();
                self.cx.set_token(None);
                self.publish(SessionState::default())
            }
        }
    }

    /// Exchanges credentials for a token and persists it.
    ///
    /// Failures are returned as the message to show the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, String> {
        let token = raw::call(
            raw::auth::Login {
                email: email.trim().to_owned(),
                password: password.to_owned(),
            },
            &self.cx,
        )
        .await
        .map_err(|err| err.notification(LOGIN_FAILED))?;

        let user: SessionUser = decode_claims(&token)
            .ok_or_else(|| {
                tracing::warn!("backend issued an unreadable token");
                LOGIN_FAILED.to_owned()
            })?
            .into();

        if let Err(err) = self.store.save(&token) {
            tracing::warn!("persisting token failed: {err}");
        }
        self.cx.set_token(Some(token));
        tracing::info!("logged in as {}", user.email);

        self.publish(SessionState {
            user: Some(user.clone()),
        });
        Ok(user)
    }

    pub fn logout(&self) {
        self.store.clear();
        self.cx.set_token(None);
        tracing::info!("logged out");
        self.publish(SessionState::default());
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn publish(&self, state: SessionState) -> SessionState {
        self.state.send_replace(state.clone());
        state
    }
}
