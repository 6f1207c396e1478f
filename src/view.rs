//! What the client shows for a given session.
//!
//! Presentation is a pure function of the [`Session`] snapshot. Both the TUI and the
//! text output render from a [`Presentation`], so the two never disagree about which
//! action is on offer.

use crate::model::{Action, Progress, Session, SessionState};

pub const TITLE: &str = "Unclog";
pub const SUBTITLE: &str = "U Need Contact Labeling On Gmail";

const AUTHORIZE_PROMPT: &str =
    "To get started, you must authorize Unclog to access your Gmail account";

const DISCLOSURE: [&str; 2] = [
    "Note: This preview version of Unclog has not yet undergone a security review by \
     Google. You will see a screen warning that the app is not verified. If you trust \
     Unclog, you can bypass this warning by clicking \u{201c}Advanced.\u{201d}",
    "Should you trust Unclog? You can decide for yourself by looking at Unclog\u{2019}s \
     source code on GitHub: https://github.com/bobg/unclog",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionButton {
    Authorize,
    Enable,
    Disable,
    Reauthorize,
}

impl ActionButton {
    pub fn label(self) -> &'static str {
        match self {
            ActionButton::Authorize => "Authorize",
            ActionButton::Enable => "Enable Unclog",
            ActionButton::Disable => "Disable Unclog",
            ActionButton::Reauthorize => "Reauthorize",
        }
    }

    pub fn key(self) -> char {
        match self {
            ActionButton::Authorize | ActionButton::Reauthorize => 'a',
            ActionButton::Enable => 'e',
            ActionButton::Disable => 'd',
        }
    }

    /// The mutating action behind this button, if it is not a hand-off.
    pub fn action(self) -> Option<Action> {
        match self {
            ActionButton::Enable => Some(Action::Enable),
            ActionButton::Disable => Some(Action::Disable),
            ActionButton::Authorize | ActionButton::Reauthorize => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReadout {
    pub num_threads: u64,
    pub num_labeled: u64,
    pub ratio: f64,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Loading,
    Card {
        message: String,
        action: ActionButton,
        notes: Vec<&'static str>,
        pending: Option<Action>,
        progress: Option<ProgressReadout>,
    },
}

pub fn present(session: &Session) -> Presentation {
    let (message, action, notes) = match &session.state {
        SessionState::Uninitialized => return Presentation::Loading,
        SessionState::Unauthorized => (
            AUTHORIZE_PROMPT.to_string(),
            ActionButton::Authorize,
            DISCLOSURE.to_vec(),
        ),
        SessionState::AuthorizedEnabled { email } => (
            format!("Unclog is presently enabled for {email}"),
            ActionButton::Disable,
            Vec::new(),
        ),
        SessionState::AuthorizedExpired { email } => (
            format!("The authorization for Unclog to access {email} has expired"),
            ActionButton::Reauthorize,
            Vec::new(),
        ),
        SessionState::AuthorizedDisabled { email } => (
            format!("Unclog is authorized but disabled for {email}"),
            ActionButton::Enable,
            Vec::new(),
        ),
    };

    Presentation::Card {
        message,
        action,
        notes,
        pending: session.pending,
        progress: session.progress.and_then(progress_readout),
    }
}

/// Percentage of threads labeled, with one decimal place. `None` when there is
/// nothing to count.
pub fn progress_percent(num_threads: Option<u64>, num_labeled: Option<u64>) -> Option<String> {
    let num_threads = num_threads.filter(|n| *n > 0)?;
    let ratio = num_labeled.unwrap_or(0) as f64 / num_threads as f64;
    Some(format!("{:.1}%", ratio * 100.0))
}

fn progress_readout(p: Progress) -> Option<ProgressReadout> {
    let percent = progress_percent(Some(p.num_threads), Some(p.num_labeled))?;
    Some(ProgressReadout {
        num_threads: p.num_threads,
        num_labeled: p.num_labeled,
        ratio: p.num_labeled as f64 / p.num_threads as f64,
        percent,
    })
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
