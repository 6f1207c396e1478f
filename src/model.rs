use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
    /// Reject a mutating action while another one is still outstanding.
    pub in_flight_guard: bool,
    /// Check enable/disable responses and roll back on failure.
    pub validate_responses: bool,
    #[serde(default)]
    pub session_cookie: Option<String>,
    pub open_browser: bool,
}

/// Mutating actions that go through the POST helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Enable,
    Disable,
}

impl Action {
    pub fn path(self) -> &'static str {
        match self {
            Action::Enable => "/s/enable",
            Action::Disable => "/s/disable",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Action::Enable => "enable",
            Action::Disable => "disable",
        }
    }
}

/// Body of `GET /s/data`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub csrf: Option<String>,
    pub email: Option<String>,
    pub enabled: Option<bool>,
    pub expired: Option<bool>,
    pub num_threads: Option<u64>,
    pub num_labeled: Option<u64>,
}

/// Body of `POST /s/enable` and `POST /s/disable`.
#[derive(Debug, Clone, Serialize)]
pub struct CsrfBody<'a> {
    pub csrf: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub num_threads: u64,
    pub num_labeled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Uninitialized,
    Unauthorized,
    AuthorizedEnabled {
        email: String,
    },
    AuthorizedDisabled {
        email: String,
    },
    AuthorizedExpired {
        email: String,
    },
}

impl SessionState {
    /// Classify a data response. Empty strings count as absent, since the
    /// backend always serializes `email`.
    pub fn from_data(data: &SessionData) -> Self {
        match non_empty(data.email.as_deref()) {
            None => SessionState::Unauthorized,
            Some(email) => {
                let email = email.to_string();
                if data.enabled.unwrap_or(false) {
                    SessionState::AuthorizedEnabled { email }
                } else if data.expired.unwrap_or(false) {
                    SessionState::AuthorizedExpired { email }
                } else {
                    SessionState::AuthorizedDisabled { email }
                }
            }
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            SessionState::AuthorizedEnabled { email }
            | SessionState::AuthorizedDisabled { email }
            | SessionState::AuthorizedExpired { email } => Some(email),
            SessionState::Uninitialized | SessionState::Unauthorized => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Unauthorized => "unauthorized",
            SessionState::AuthorizedEnabled { .. } => "enabled",
            SessionState::AuthorizedDisabled { .. } => "disabled",
            SessionState::AuthorizedExpired { .. } => "expired",
        }
    }
}

/// Client-side view of the account, owned by the session controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<Action>,
}

impl Session {
    pub fn from_data(data: SessionData) -> Self {
        let state = SessionState::from_data(&data);
        let progress = match (data.num_threads, data.num_labeled) {
            (Some(num_threads), num_labeled) => Some(Progress {
                num_threads,
                num_labeled: num_labeled.unwrap_or(0),
            }),
            (None, _) => None,
        };
        Self {
            state,
            csrf: non_empty(data.csrf.as_deref()).map(str::to_string),
            progress,
            pending: None,
        }
    }

    pub fn loaded(&self) -> bool {
        self.state != SessionState::Uninitialized
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// The single alert slot shared by the whole client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub visible: bool,
    pub text: Option<String>,
}

/// Where an authorization hand-off sends the user. Control leaves the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub url: url::Url,
}

/// Structured status events emitted by the orchestrator for presentation layers.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(InfoEvent),
    Loaded,
}

#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    Pending(Action),
    Rejected { action: Action, reason: String },
    OpenedBrowser { url: String },
    OpenBrowserFailed { url: String, reason: String },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::Pending(Action::Enable) => "Enabling…".to_string(),
            InfoEvent::Pending(Action::Disable) => "Disabling…".to_string(),
            InfoEvent::Rejected { action, reason } => {
                format!("Cannot {} right now: {}", action.verb(), reason)
            }
            InfoEvent::OpenedBrowser { url } => {
                format!("Continue in your browser, then reload ({url})")
            }
            InfoEvent::OpenBrowserFailed { url, reason } => {
                format!("Could not open a browser ({reason}); visit {url}, then reload")
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
