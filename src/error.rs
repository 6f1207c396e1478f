use crate::model::Action;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} answered {status}")]
    Status {
        path: &'static str,
        status: StatusCode,
    },
    #[error("could not decode {path} response: {source}")]
    Decode {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode {path} request body: {source}")]
    Encode {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("cannot {} while the session is {state}", .action.verb())]
    InvalidState { action: Action, state: &'static str },
    #[error("no CSRF token; the session has not been loaded")]
    MissingCsrf,
    #[error("a {} request is already in flight", .0.verb())]
    ActionInFlight(Action),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
