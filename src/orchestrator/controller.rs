//! Session command controller.
//!
//! Owns the task set for in-flight requests and emits events for presentation layers.

use crate::error::ClientError;
use crate::model::{Action, ClientConfig, InfoEvent, SessionState, UiEvent};
use crate::session::SessionController;
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Reload,
    Enable,
    Disable,
    Authorize,
    DismissAlert,
    Quit,
}

/// Start the first load, then dispatch UI commands until quit.
///
/// Every request runs as its own task. Nothing serializes them beyond the session
/// controller's optional in-flight guard, so the last response to land wins.
pub(crate) async fn run_controller(
    cfg: &ClientConfig,
    session: SessionController,
    event_tx: UnboundedSender<UiEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut tasks: JoinSet<()> = JoinSet::new();
    spawn_load(&mut tasks, &session, &event_tx);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                debug!(?cmd, "ui command");
                match cmd {
                    UiCommand::Reload => {
                        session.reset();
                        let _ = event_tx.send(UiEvent::Info(InfoEvent::Message("Reloading…".into())));
                        spawn_load(&mut tasks, &session, &event_tx);
                    }
                    UiCommand::Enable => spawn_action(&mut tasks, &session, Action::Enable, &event_tx),
                    UiCommand::Disable => spawn_action(&mut tasks, &session, Action::Disable, &event_tx),
                    UiCommand::Authorize => {
                        let expired = matches!(session.snapshot().state, SessionState::AuthorizedExpired { .. });
                        let handoff = if expired { session.reauthorize() } else { session.authorize() };
                        let info = match handoff {
                            Ok(handoff) => super::hand_off(&handoff, cfg.open_browser),
                            Err(e) => InfoEvent::Message(format!("Authorization unavailable: {e}")),
                        };
                        let _ = event_tx.send(UiEvent::Info(info));
                    }
                    UiCommand::DismissAlert => session.notifier().dismiss(),
                    UiCommand::Quit => break,
                }
            }
            Some(joined) = tasks.join_next() => {
                if let Err(e) = joined {
                    if !e.is_cancelled() {
                        warn!(error = %e, "session task failed");
                        let _ = event_tx.send(UiEvent::Info(InfoEvent::Message(format!(
                            "Request task failed: {e}"
                        ))));
                    }
                }
            }
        }
    }

    // Outstanding requests are abandoned with the session.
    tasks.abort_all();
    Ok(())
}

fn spawn_load(
    tasks: &mut JoinSet<()>,
    session: &SessionController,
    event_tx: &UnboundedSender<UiEvent>,
) {
    let session = session.clone();
    let event_tx = event_tx.clone();
    tasks.spawn(async move {
        // Failures already raised an alert.
        if session.load().await.is_ok() {
            let _ = event_tx.send(UiEvent::Loaded);
        }
    });
}

fn spawn_action(
    tasks: &mut JoinSet<()>,
    session: &SessionController,
    action: Action,
    event_tx: &UnboundedSender<UiEvent>,
) {
    let ticket = match session.begin(action) {
        Ok(ticket) => ticket,
        Err(e) => {
            let reason = match e {
                ClientError::ActionInFlight(_) => "another request is still in flight".to_string(),
                other => other.to_string(),
            };
            let _ = event_tx.send(UiEvent::Info(InfoEvent::Rejected { action, reason }));
            return;
        }
    };
    let _ = event_tx.send(UiEvent::Info(InfoEvent::Pending(action)));

    let session = session.clone();
    let event_tx = event_tx.clone();
    tasks.spawn(async move {
        let msg = match session.complete(ticket).await {
            Ok(()) => match action {
                Action::Enable => "Unclog enabled",
                Action::Disable => "Unclog disabled",
            },
            Err(_) => "Request failed",
        };
        let _ = event_tx.send(UiEvent::Info(InfoEvent::Message(msg.into())));
    });
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
