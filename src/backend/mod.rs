//! HTTP access to the Unclog backend.
//!
//! One `reqwest` client per process carries the session cookie, which stands in for
//! the browser's same-origin credentials. Reads go through [`BackendClient::fetch_data`];
//! every mutating call goes through the POST helper in [`post`].

mod post;

use crate::error::{ClientError, ClientResult};
use crate::model::{ClientConfig, SessionData};
use reqwest::cookie::Jar;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub(crate) const DATA_PATH: &str = "/s/data";
pub(crate) const AUTH_PATH: &str = "/s/auth";

#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(cfg: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&cfg.base_url)?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = cfg.session_cookie.as_deref() {
            // Scope to the site root; every endpoint lives under `/s/`.
            jar.add_cookie_str(cookie, &base_url.join("/")?);
        }

        // Enable/disable answer with a redirect to the page itself; never follow it.
        let mut builder = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .cookie_provider(jar)
            .redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| ClientError::Transport {
            path: "client",
            source,
        })?;

        Ok(Self { http, base_url })
    }

    pub(crate) fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Absolute URL of the authorization endpoint, used for both first-time and
    /// renewed authorization.
    pub fn auth_url(&self) -> ClientResult<Url> {
        self.url(AUTH_PATH)
    }

    /// `GET /s/data`. A non-success status or a body that is not JSON is an error.
    pub async fn fetch_data(&self) -> ClientResult<SessionData> {
        let url = self.url(DATA_PATH)?;
        debug!(%url, "fetching session data");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                path: DATA_PATH,
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                path: DATA_PATH,
                status,
            });
        }

        let body = resp.bytes().await.map_err(|source| ClientError::Transport {
            path: DATA_PATH,
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            path: DATA_PATH,
            source,
        })
    }
}

#[cfg(test)]
#[path = "../tests/backend_tests.rs"]
mod tests;
