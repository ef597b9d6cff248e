//! Mutating user actions - signup and unregister
//!
//! Both follow the same lifecycle: validate the session client-side,
//! issue the request with the bearer token attached, then report the
//! server's reply back to the UI loop.

use super::UiEvent;
use crate::api::ApiClient;
use crate::session::Session;
use tokio::sync::mpsc;

/// Which mutation is being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Signup,
    Unregister,
}

impl ActionKind {
    /// Generic feedback when the server gave no detail
    pub fn fallback_error(self) -> &'static str {
        match self {
            ActionKind::Signup => "Failed to sign up. Please try again.",
            ActionKind::Unregister => "Failed to unregister. Please try again.",
        }
    }
}

/// Blocking notice shown when a mutation is attempted without a session
pub const SIGNED_OUT_NOTICE: &str = "You must be signed in to manage signups.";

/// Validate the session and issue a mutating request.
///
/// Gating happens before any network call: without an authenticated
/// session the blocking notice is returned and nothing is sent. The
/// server's reply arrives later as `UiEvent::ActionFinished`.
pub fn submit(
    kind: ActionKind,
    activity: String,
    email: String,
    session: &Session,
    api: &ApiClient,
    events: &mpsc::Sender<UiEvent>,
) -> Result<(), &'static str> {
    if !session.is_authenticated() {
        return Err(SIGNED_OUT_NOTICE);
    }
    let Some(token) = session.token().map(String::from) else {
        return Err(SIGNED_OUT_NOTICE);
    };

    let api = api.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let result = match kind {
            ActionKind::Signup => api.signup(&token, &activity, &email).await,
            ActionKind::Unregister => api.unregister(&token, &activity, &email).await,
        };
        let _ = events.send(UiEvent::ActionFinished { kind, result }).await;
    });
    Ok(())
}
