//! Text summary builder for CLI output.
//!
//! Formats a [`Presentation`] as plain lines for text mode.

use crate::model::{Action, Session};
use crate::view::{self, Presentation};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from the current session.
pub(crate) fn build_text_summary(session: &Session) -> TextSummary {
    let mut lines = vec![format!("{}: {}", view::TITLE, view::SUBTITLE)];

    match view::present(session) {
        Presentation::Loading => lines.push("Loading…".into()),
        Presentation::Card {
            message,
            action,
            notes,
            pending,
            progress,
        } => {
            lines.push(message);
            match pending {
                Some(Action::Enable) => lines.push("Enabling…".into()),
                Some(Action::Disable) => lines.push("Disabling…".into()),
                None => lines.push(format!("Next step: {}", action.label())),
            }
            if let Some(p) = progress {
                lines.push(format!(
                    "Progress: {} ({} of {} threads labeled)",
                    p.percent, p.num_labeled, p.num_threads
                ));
            }
            for note in notes {
                lines.push(String::new());
                lines.push(note.to_string());
            }
        }
    }

    TextSummary { lines }
}

#[cfg(test)]
#[path = "tests/text_summary_tests.rs"]
mod tests;
