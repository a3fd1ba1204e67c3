//! Session manager.
//!
//! Owns the in-memory session and its mirror in [`SessionStorage`]. The state
//! starts as [`SessionState::Restoring`], is resolved exactly once by
//! [`SessionManager::restore`], and afterwards only moves between
//! `Anonymous` and `Authenticated` through [`login`](SessionManager::login)
//! and [`logout`](SessionManager::logout).
//!
//! Storage is always written before the in-memory state changes, so a caller
//! that awaited `login` can rely on the bearer token being visible to every
//! subsequent request. Restore, login and logout hold one transition lock
//! while they touch storage, so a restore that finds nothing cannot clear
//! entries a concurrent login just wrote.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::identity::{AuthorizationView, UserIdentity};
use crate::push::PushInitializer;
use crate::services::AuthService;
use crate::store::{self, SessionStorage};
use crate::token;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity: UserIdentity,
    pub token: String,
    pub expires_at: Option<OffsetDateTime>,
}

impl Session {
    pub fn new(token: impl Into<String>, identity: UserIdentity) -> Self {
        let token = token.into();
        let expires_at = token::decode(&token).and_then(|claims| claims.expires_at());
        Self {
            identity,
            token,
            expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Stored session not read yet.
    #[default]
    Restoring,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_restoring(&self) -> bool {
        matches!(self, SessionState::Restoring)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.session().map(|s| &s.identity)
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    pub fn authorization(&self) -> AuthorizationView {
        AuthorizationView::for_role(self.identity().map(|identity| identity.role))
    }
}

pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<SessionState>,
    restore_started: AtomicBool,
    transition: Mutex<()>,
    push: Option<Arc<PushInitializer>>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(SessionState::Restoring);
        Self {
            storage,
            state,
            restore_started: AtomicBool::new(false),
            transition: Mutex::new(()),
            push: None,
        }
    }

    /// Attaches the push initializer run on each authenticated transition.
    pub fn with_push(mut self, push: Arc<PushInitializer>) -> Self {
        self.push = Some(push);
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_restoring(&self) -> bool {
        self.state.borrow().is_restoring()
    }

    pub fn authorization(&self) -> AuthorizationView {
        self.state.borrow().authorization()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization().is_authenticated
    }

    pub fn is_admin(&self) -> bool {
        self.authorization().is_admin
    }

    pub fn is_super_admin(&self) -> bool {
        self.authorization().is_super_admin
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.state.borrow().identity().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    /// Resolves the startup state from storage. Runs once; later calls return
    /// the current state untouched.
    ///
    /// Any unusable stored session (missing half, unreadable profile, expired
    /// or malformed token, storage failure) resolves to `Anonymous` after the
    /// stored entries are cleared. The stored profile is taken as-is and is not
    /// compared against the token's claims.
    pub async fn restore(&self) -> SessionState {
        if self.restore_started.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        let transition = self.transition.lock().await;
        let next = match self.load_stored_session().await {
            Some(session) => SessionState::Authenticated(session),
            None => {
                if self.is_restoring() {
                    if let Err(e) = store::clear_session(self.storage.as_ref()).await {
                        warn!(error = %e, "failed to clear stale session entries");
                    }
                }
                SessionState::Anonymous
            }
        };

        let authenticated = matches!(next, SessionState::Authenticated(_));
        let applied = self.state.send_if_modified(|state| {
            if state.is_restoring() {
                *state = next;
                true
            } else {
                false
            }
        });
        drop(transition);

        if applied {
            info!(authenticated, "session restored");
            if authenticated {
                self.on_authenticated();
            }
        } else {
            debug!("session changed during restore, keeping current state");
        }

        self.state()
    }

    /// Persists `token` and `identity`, then marks the session authenticated.
    ///
    /// Waits for an in-flight restore to settle first. Push registration is
    /// started in the background and not awaited.
    pub async fn login(&self, token: impl Into<String>, identity: UserIdentity) -> Result<()> {
        let session = Session::new(token, identity);
        let user_id = session.identity.id;
        {
            let _transition = self.transition.lock().await;
            store::write_session(self.storage.as_ref(), &session.token, &session.identity)
                .await?;
            self.state.send_replace(SessionState::Authenticated(session));
        }
        info!(user_id, "logged in");

        self.on_authenticated();
        Ok(())
    }

    /// Signs in against the API and establishes the resulting session.
    pub async fn sign_in(&self, auth: &AuthService, username: &str, password: &str) -> Result<()> {
        let (token, identity) = auth.login(username, password).await?;
        self.login(token, identity).await
    }

    /// Clears storage, then the in-memory session. Safe to call repeatedly.
    pub async fn logout(&self) -> Result<()> {
        let was_authenticated = {
            let _transition = self.transition.lock().await;
            store::clear_session(self.storage.as_ref()).await?;
            let was_authenticated = self.is_authenticated();
            self.state.send_replace(SessionState::Anonymous);
            was_authenticated
        };
        if was_authenticated {
            info!("logged out");
        }

        if let Some(push) = &self.push {
            push.reset();
        }
        Ok(())
    }

    async fn load_stored_session(&self) -> Option<Session> {
        let storage = self.storage.as_ref();

        let token = match store::read_token(storage).await {
            Ok(token) => token?,
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                return None;
            }
        };
        let identity = match store::read_identity(storage).await {
            Ok(identity) => identity?,
            Err(e) => {
                warn!(error = %e, "could not read stored profile");
                return None;
            }
        };

        if !token::is_valid(&token) {
            debug!("stored token is expired or malformed");
            return None;
        }

        Some(Session::new(token, identity))
    }

    fn on_authenticated(&self) {
        let Some(push) = self.push.clone() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let outcome = push.ensure_registered().await;
                    debug!(?outcome, "push initialization finished");
                });
            }
            Err(_) => warn!("no async runtime, push registration skipped"),
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let restoring = self.is_restoring();
        let authorization = self.authorization();
        f.debug_struct("SessionManager")
            .field("restoring", &restoring)
            .field("authorization", &authorization)
            .finish_non_exhaustive()
    }
}
