use crate::model::{Alert, Session};
use crate::orchestrator::UiCommand;
use crate::view::{self, ActionButton, Presentation};
use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Default)]
pub struct UiState {
    pub session: Session,
    pub alert: Alert,
    pub info: String,
    pub show_help: bool,
    pub in_flight_guard: bool,
    pub last_loaded: Option<String>,
    pub base_url: String,
    pub ticks: usize,
}

/// What a key press means in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Command(UiCommand),
    ToggleHelp,
    Ignored,
}

impl UiState {
    /// The button currently on offer, if the user may press it now.
    pub fn available_action(&self) -> Option<ActionButton> {
        match view::present(&self.session) {
            Presentation::Loading => None,
            Presentation::Card {
                action, pending, ..
            } => {
                let blocked = self.in_flight_guard && pending.is_some() && action.action().is_some();
                (!blocked).then_some(action)
            }
        }
    }

    /// Map a key to a command. Only the presented action is reachable, and an open
    /// alert swallows everything except dismiss and quit.
    pub fn key_outcome(&self, modifiers: KeyModifiers, code: KeyCode) -> KeyOutcome {
        match (modifiers, code) {
            (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                return KeyOutcome::Command(UiCommand::Quit);
            }
            _ => {}
        }

        if self.alert.visible {
            return match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('o') => {
                    KeyOutcome::Command(UiCommand::DismissAlert)
                }
                _ => KeyOutcome::Ignored,
            };
        }

        match code {
            KeyCode::Char('?') => return KeyOutcome::ToggleHelp,
            KeyCode::Esc if self.show_help => return KeyOutcome::ToggleHelp,
            KeyCode::Char('r') => return KeyOutcome::Command(UiCommand::Reload),
            _ => {}
        }

        let Some(button) = self.available_action() else {
            return KeyOutcome::Ignored;
        };
        let pressed = match code {
            KeyCode::Enter => true,
            KeyCode::Char(c) => c == button.key(),
            _ => false,
        };
        if !pressed {
            return KeyOutcome::Ignored;
        }
        KeyOutcome::Command(match button {
            ActionButton::Authorize | ActionButton::Reauthorize => UiCommand::Authorize,
            ActionButton::Enable => UiCommand::Enable,
            ActionButton::Disable => UiCommand::Disable,
        })
    }
}

#[cfg(test)]
#[path = "../tests/tui_state_tests.rs"]
mod tests;
