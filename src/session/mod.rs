//! Session management - bearer token ownership, persistence, and mode
//!
//! The session is the only component that touches the persisted token.
//! Mode transitions are published over a watch channel so the roster view
//! can re-render removal controls when authentication flips.

use crate::api::{ApiClient, ApiError, LoginReply};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::sync::watch;

/// The client's belief about its own authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Unauthenticated,
    Authenticated,
}

/// Durable storage for the opaque session token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Option<String> {
        let token = std::fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
            .with_context(|| format!("failed to write token to {}", self.path.display()))
    }

    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove token file: {}", e);
            }
        }
    }
}

/// Owns the token, the display name, and the derived mode.
///
/// Everything that gates on authentication consults `is_authenticated()`
/// rather than inspecting the token.
pub struct Session {
    store: TokenStore,
    token: Option<String>,
    display_name: Option<String>,
    mode_tx: watch::Sender<Mode>,
}

impl Session {
    pub fn new(store: TokenStore) -> Self {
        let (mode_tx, _) = watch::channel(Mode::Unauthenticated);
        Self {
            store,
            token: None,
            display_name: None,
            mode_tx,
        }
    }

    /// Subscribe to mode transitions
    pub fn subscribe(&self) -> watch::Receiver<Mode> {
        self.mode_tx.subscribe()
    }

    pub fn mode(&self) -> Mode {
        *self.mode_tx.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.mode() == Mode::Authenticated
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Restore a persisted session at startup. Called at most once per run.
    ///
    /// A stored token is validated against `/check-auth`; rejection or a
    /// transport failure clears it.
    pub async fn restore(&mut self, api: &ApiClient) {
        let Some(token) = self.store.load() else {
            self.mode_tx.send_replace(Mode::Unauthenticated);
            return;
        };
        match api.check_auth(&token).await {
            Ok(check) if check.authenticated => {
                tracing::info!(
                    "Restored session for {}",
                    check.name.as_deref().unwrap_or("unknown user")
                );
                self.token = Some(token);
                self.display_name = check.name;
                self.mode_tx.send_replace(Mode::Authenticated);
            }
            Ok(_) => {
                tracing::info!("Stored token rejected by server; clearing it");
                self.store.clear();
                self.mode_tx.send_replace(Mode::Unauthenticated);
            }
            Err(e) => {
                tracing::warn!("Auth check failed: {}", e);
                self.store.clear();
                self.mode_tx.send_replace(Mode::Unauthenticated);
            }
        }
    }

    /// Adopt a freshly issued credential and persist it
    pub fn establish(&mut self, reply: LoginReply) {
        if let Err(e) = self.store.save(&reply.token) {
            tracing::warn!("Failed to persist session token: {}", e);
        }
        self.token = Some(reply.token);
        self.display_name = Some(reply.name);
        self.mode_tx.send_replace(Mode::Authenticated);
    }

    /// Drop all local session state, including the persisted token.
    ///
    /// Returns the token that was active so the caller can fire the
    /// best-effort logout request. Local state is gone either way; a
    /// failed logout call must never leave stale authenticated UI.
    pub fn clear_local(&mut self) -> Option<String> {
        let token = self.token.take();
        self.display_name = None;
        self.store.clear();
        self.mode_tx.send_replace(Mode::Unauthenticated);
        token
    }

    /// Authenticate against the login endpoint and persist the token.
    /// Failure leaves the current session untouched.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let reply = api.login(username, password).await?;
        let name = reply.name.clone();
        self.establish(reply);
        Ok(name)
    }

    /// End the session. The logout endpoint is best-effort: a failure is
    /// logged and local state is cleared regardless.
    pub async fn logout(&mut self, api: &ApiClient) {
        let token = self.token.take().or_else(|| self.store.load());
        if let Some(token) = token {
            if let Err(e) = api.logout(&token).await {
                tracing::warn!("Logout request failed: {}", e);
            }
        }
        self.display_name = None;
        self.store.clear();
        self.mode_tx.send_replace(Mode::Unauthenticated);
    }
}
