//! Session refresh

use crate::ApiClient;
use crate::client::include_credentials;
use crate::platform::boxed;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct RefreshRequest {
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default, rename = "refreshToken", alias = "refresh_token")]
    refresh_token: Option<String>,
}

impl ApiClient {
    /// Ask the backend for a fresh session
    ///
    /// Concurrent callers share one network call and all observe its outcome.
    /// Returns `false` on any failure, leaving the cached token in place, and
    /// immediately when the platform has no interactive session.
    pub async fn refresh_session(&self) -> bool {
        if !self.inner.platform.is_interactive() {
            debug!("Skipping session refresh without an interactive session");
            return false;
        }

        let refresh = self.inner.session.join_or_start(|id| {
            let client = self.clone();
            boxed(async move {
                let refreshed = client.send_refresh().await;
                client.inner.session.finish_refresh(id);
                refreshed
            })
        });
        refresh.await
    }

    async fn send_refresh(&self) -> bool {
        let body = RefreshRequest {
            refresh_token: self.inner.session.refresh_token(),
        };
        let request = self
            .inner
            .http
            .post(self.api_url(&self.inner.refresh_path))
            .json(&body);

        let response = match include_credentials(request).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Session refresh request failed");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Session refresh rejected");
            return false;
        }

        // A 2xx body that does not parse counts as a failed refresh
        match response.json::<RefreshResponse>().await {
            Ok(RefreshResponse { refresh_token }) => {
                if let Some(token) = refresh_token.filter(|t| !t.is_empty()) {
                    self.inner.session.set_refresh_token(Some(token));
                }
                debug!("Session refreshed");
                true
            }
            Err(err) => {
                warn!(error = %err, "Session refresh returned an unreadable body");
                false
            }
        }
    }
}
