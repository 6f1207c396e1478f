use super::BackendClient;
use crate::error::{ClientError, ClientResult};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::debug;

impl BackendClient {
    /// Send a mutating request: POST, JSON body, session cookie attached.
    ///
    /// Only transport failures are errors. The response is returned as-is and the
    /// caller decides whether its status matters.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &'static str,
        body: &B,
    ) -> ClientResult<reqwest::Response> {
        let url = self.url(path)?;
        let payload =
            serde_json::to_vec(body).map_err(|source| ClientError::Encode { path, source })?;
        debug!(%url, bytes = payload.len(), "posting");

        self.http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| ClientError::Transport { path, source })
    }
}
