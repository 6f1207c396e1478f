//! Session controller.
//!
//! Owns the client's view of the account and the CSRF token, and mediates every
//! network call. State changes are published as whole [`Session`] snapshots through a
//! watch channel so presentation layers render purely from the latest value.

use crate::backend::BackendClient;
use crate::error::{ClientError, ClientResult};
use crate::model::{Action, ClientConfig, CsrfBody, Handoff, Session, SessionState};
use crate::notifier::Notifier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub const LOAD_FAILED_ALERT: &str =
    "Error loading data. Please try reloading this page in a moment.";

/// Policy switches for mutating calls. Both are off unless asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationPolicy {
    pub in_flight_guard: bool,
    pub validate_responses: bool,
}

impl From<&ClientConfig> for MutationPolicy {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            in_flight_guard: cfg.in_flight_guard,
            validate_responses: cfg.validate_responses,
        }
    }
}

/// An accepted mutating action, waiting for its request to be sent.
#[derive(Debug)]
#[must_use = "a ticket does nothing until passed to `complete`"]
pub struct Ticket {
    action: Action,
    csrf: String,
}

#[derive(Debug, Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    backend: BackendClient,
    notifier: Notifier,
    policy: MutationPolicy,
    session: watch::Sender<Session>,
    /// Accepted actions whose request has not completed. Only touched while the
    /// session channel is locked for writing.
    outstanding: AtomicUsize,
}

impl SessionController {
    /// The notifier is required up front so no action can run before the alert
    /// surface exists.
    pub fn new(cfg: &ClientConfig, notifier: Notifier) -> ClientResult<Self> {
        let backend = BackendClient::new(cfg)?;
        Ok(Self::with_backend(backend, notifier, MutationPolicy::from(cfg)))
    }

    pub fn with_backend(
        backend: BackendClient,
        notifier: Notifier,
        policy: MutationPolicy,
    ) -> Self {
        let (session, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                notifier,
                policy,
                session,
                outstanding: AtomicUsize::new(0),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.session.subscribe()
    }

    pub fn snapshot(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Forget the account, as a page reload would. A request still out keeps its
    /// `pending` marker until it completes.
    pub fn reset(&self) {
        self.inner.session.send_modify(|s| {
            let pending = s.pending;
            *s = Session::default();
            s.pending = pending;
        });
    }

    /// Fetch the account state and replace the session with it.
    ///
    /// On failure the session is left as it was and a single alert is raised.
    pub async fn load(&self) -> ClientResult<()> {
        match self.inner.backend.fetch_data().await {
            Ok(data) => {
                let next = Session::from_data(data);
                info!(state = next.state.name(), "session loaded");
                self.inner.session.send_modify(|s| {
                    let pending = s.pending;
                    *s = next;
                    s.pending = pending;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "loading session data failed");
                self.inner.notifier.show(LOAD_FAILED_ALERT);
                Err(e)
            }
        }
    }

    pub async fn enable(&self) -> ClientResult<()> {
        let ticket = self.begin(Action::Enable)?;
        self.complete(ticket).await
    }

    pub async fn disable(&self) -> ClientResult<()> {
        let ticket = self.begin(Action::Disable)?;
        self.complete(ticket).await
    }

    /// Check the precondition for `action` and mark it pending.
    ///
    /// Enabling needs an authorized, disabled, unexpired account; disabling needs an
    /// enabled one. With the in-flight guard on, nothing is accepted while another
    /// mutating action is outstanding.
    pub fn begin(&self, action: Action) -> ClientResult<Ticket> {
        let guard = self.inner.policy.in_flight_guard;
        let mut outcome = Err(ClientError::MissingCsrf);

        self.inner.session.send_if_modified(|s| {
            outcome = check_precondition(s, action, guard);
            if outcome.is_ok() {
                self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
                s.pending = Some(action);
                true
            } else {
                false
            }
        });

        if let Err(e) = &outcome {
            warn!(action = action.verb(), error = %e, "action rejected");
        }
        outcome
    }

    /// Send the request for an accepted action and apply its result.
    ///
    /// Without response validation the local state flips to the action's target no
    /// matter how the request went. With validation, a transport error or a
    /// non-success status leaves the state unchanged and raises an alert.
    pub async fn complete(&self, ticket: Ticket) -> ClientResult<()> {
        let Ticket { action, csrf } = ticket;
        let result = self
            .inner
            .backend
            .post(action.path(), &CsrfBody { csrf: &csrf })
            .await;

        let failure = match result {
            Ok(resp) => {
                let status = resp.status();
                let accepted = status.is_success() || status.is_redirection();
                (!accepted).then(|| ClientError::Status {
                    path: action.path(),
                    status,
                })
            }
            Err(e) => Some(e),
        };

        if let Some(e) = failure {
            if self.inner.policy.validate_responses {
                warn!(action = action.verb(), error = %e, "action failed; keeping previous state");
                self.finish(action, false);
                self.inner.notifier.show(format!(
                    "Could not {} Unclog. Please try again in a moment.",
                    action.verb()
                ));
                return Err(e);
            }
            warn!(action = action.verb(), error = %e, "action failed; applying anyway");
        }

        self.finish(action, true);
        Ok(())
    }

    /// Hand control to the backend's authorization flow. The session is untouched;
    /// a fresh load after the round trip picks up the result.
    pub fn authorize(&self) -> ClientResult<Handoff> {
        let url = self.inner.backend.auth_url()?;
        info!(%url, "handing off to authorization");
        Ok(Handoff { url })
    }

    /// Renewal after expiry goes through the same endpoint as first-time authorization.
    pub fn reauthorize(&self) -> ClientResult<Handoff> {
        info!("authorization expired; renewing");
        self.authorize()
    }

    fn finish(&self, action: Action, apply: bool) {
        self.inner.session.send_modify(|s| {
            let before = self.inner.outstanding.fetch_sub(1, Ordering::SeqCst);
            if before <= 1 {
                s.pending = None;
            }
            if !apply {
                return;
            }
            // A reload while the request was out may have dropped the account.
            if let Some(email) = s.state.email() {
                let email = email.to_string();
                s.state = match action {
                    Action::Enable => SessionState::AuthorizedEnabled { email },
                    Action::Disable => SessionState::AuthorizedDisabled { email },
                };
                info!(state = s.state.name(), "session updated");
            }
        });
    }
}

fn check_precondition(s: &Session, action: Action, guard: bool) -> ClientResult<Ticket> {
    let allowed = matches!(
        (action, &s.state),
        (Action::Enable, SessionState::AuthorizedDisabled { .. })
            | (Action::Disable, SessionState::AuthorizedEnabled { .. })
    );
    if !allowed {
        return Err(ClientError::InvalidState {
            action,
            state: s.state.name(),
        });
    }
    if guard {
        if let Some(pending) = s.pending {
            return Err(ClientError::ActionInFlight(pending));
        }
    }
    let csrf = s.csrf.clone().ok_or(ClientError::MissingCsrf)?;
    Ok(Ticket { action, csrf })
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
