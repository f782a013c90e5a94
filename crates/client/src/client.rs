//! Authenticated API client

use crate::platform::{Platform, default_platform};
use crate::url::{api_url, normalize_base, normalize_path, route_of};
use crate::{ClientConfig, ClientError, RequestOptions, SessionState};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

pub(crate) struct Inner {
    pub(crate) http: Client,
    pub(crate) base_url: Option<String>,
    pub(crate) refresh_path: String,
    pub(crate) logout_path: String,
    pub(crate) app_root: String,
    pub(crate) platform: Arc<dyn Platform>,
    pub(crate) session: SessionState,
}

/// MediBuddy API client
///
/// Cloning is cheap; clones share the same session state.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("refresh_path", &self.inner.refresh_path)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// 401 and 403 both mean the backend no longer accepts the session
pub(crate) fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Send and store cookies for the backend origin
#[cfg(target_arch = "wasm32")]
pub(crate) fn include_credentials(request: RequestBuilder) -> RequestBuilder {
    request.fetch_credentials_include()
}

/// Send and store cookies for the backend origin
///
/// Native clients keep cookies in the client's own jar.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn include_credentials(request: RequestBuilder) -> RequestBuilder {
    request
}

impl ApiClient {
    /// Create a client for `base_url` with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder().config(config).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URL requests are resolved against, if any
    pub fn base_url(&self) -> Option<&str> {
        self.inner.base_url.as_deref()
    }

    /// Resolve `path` against the configured base URL
    pub fn api_url(&self, path: &str) -> String {
        api_url(self.inner.base_url.as_deref(), path)
    }

    /// Session state shared by all clones of this client
    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    /// Currently cached refresh token
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.session.refresh_token()
    }

    /// Replace the cached refresh token
    pub fn set_refresh_token(&self, token: Option<String>) {
        self.inner.session.set_refresh_token(token);
    }

    /// Clear the cached refresh token
    pub fn clear_auth_cache(&self) {
        self.inner.session.clear();
    }

    fn is_refresh_path(&self, path: &str) -> bool {
        route_of(path) == self.inner.refresh_path
    }

    async fn send(&self, path: &str, options: &RequestOptions) -> Result<Response, ClientError> {
        let mut request = self
            .inner
            .http
            .request(options.method.clone(), self.api_url(path));

        for (name, value) in options.headers.iter() {
            request = request.header(name, value);
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        Ok(include_credentials(request).send().await?)
    }

    /// Issue an API call, recovering an expired session at most once
    ///
    /// A 401/403 answer triggers a session refresh followed by a single retry,
    /// unless `skip_auth` is set or the call targets the refresh endpoint. A
    /// session that stays unauthorized is handed to
    /// [`handle_unauthorized`](Self::handle_unauthorized) unless
    /// `skip_auth_redirect` is set. HTTP failures come back as responses; only
    /// transport errors are returned as `Err`.
    #[tracing::instrument(level = "debug", skip(self, options), fields(method = %options.method))]
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let path = normalize_path(path);
        let response = self.send(&path, &options).await?;

        if !is_auth_failure(response.status()) {
            return Ok(response);
        }

        if !options.skip_auth && !self.is_refresh_path(&path) {
            debug!(status = %response.status(), "Session rejected, attempting refresh");
            if self.refresh_session().await {
                let retried = self.send(&path, &options).await?;
                if is_auth_failure(retried.status()) && !options.skip_auth_redirect {
                    self.handle_unauthorized();
                }
                return Ok(retried);
            }
        }

        if !options.skip_auth_redirect {
            self.handle_unauthorized();
        }
        Ok(response)
    }

    /// Issue an API call and decode a JSON success body
    ///
    /// Non-2xx answers are mapped with [`ClientError::from_status`], using the
    /// body's `error` or `message` field as the message when present.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let response = self.request(path, options).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = ApiErrorBody::describe(&body).unwrap_or_else(|| status.to_string());
            let error = ClientError::from_status(status, message);
            if error.is_auth_failure() {
                debug!(%status, "Session still rejected after recovery");
            }
            Err(error)
        }
    }

    /// Sign out: drop the cached token and tell the backend
    ///
    /// Unlike the forced path this awaits the backend and never navigates.
    pub async fn logout(&self) -> Result<Response, ClientError> {
        self.clear_auth_cache();
        let logout_path = self.inner.logout_path.clone();
        self.request(
            &logout_path,
            RequestOptions::post().skip_auth().skip_auth_redirect(),
        )
        .await
    }
}

/// Error body the backend returns alongside non-2xx statuses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable message for a raw error body
    ///
    /// Prefers `error`, then `message`, then the raw text.
    pub fn describe(body: &str) -> Option<String> {
        let parsed = serde_json::from_str::<Self>(body).ok().unwrap_or_default();
        parsed
            .error
            .or(parsed.message)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ClientConfig,
    platform: Option<Arc<dyn Platform>>,
    #[cfg(not(target_arch = "wasm32"))]
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Start from loaded configuration
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the session refresh endpoint
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.config.refresh_path = path.into();
        self
    }

    /// Set the session logout endpoint
    #[must_use]
    pub fn logout_path(mut self, path: impl Into<String>) -> Self {
        self.config.logout_path = path.into();
        self
    }

    /// Set the application root used for forced navigation
    #[must_use]
    pub fn app_root(mut self, path: impl Into<String>) -> Self {
        self.config.app_root = path.into();
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the request timeout
    ///
    /// Native targets only; the browser applies its own `fetch` limits.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the host platform
    #[must_use]
    pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let config = self.config;
        config.validate()?;

        let base_url = normalize_base(config.base_url.as_deref());
        if let Some(base) = &base_url {
            ::url::Url::parse(base).map_err(|e| {
                ClientError::Configuration(format!("invalid base_url {base:?}: {e}"))
            })?;
        }

        let client_builder = ClientBuilder::new().user_agent(config.user_agent.as_str());

        #[cfg(not(target_arch = "wasm32"))]
        let client_builder = {
            let timeout = self
                .timeout
                .or_else(|| config.timeout_secs.map(Duration::from_secs));
            let client_builder = client_builder.cookie_store(true);
            match timeout {
                Some(timeout) => client_builder.timeout(timeout),
                None => client_builder,
            }
        };

        let http = client_builder.build()?;

        let inner = Inner {
            http,
            base_url,
            refresh_path: normalize_path(config.refresh_path.trim()).into_owned(),
            logout_path: normalize_path(config.logout_path.trim()).into_owned(),
            app_root: normalize_path(config.app_root.trim()).into_owned(),
            platform: self.platform.unwrap_or_else(default_platform),
            session: SessionState::new(),
        };

        Ok(ApiClient {
            inner: Arc::new(inner),
        })
    }
}
