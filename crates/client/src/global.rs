//! Process-wide default client
//!
//! Console pages share one session, so they share one client. Install it
//! once at startup with [`install`]; otherwise the first use builds one from
//! [`ClientConfig::from_env`] and the target's default platform.
//!
//! Functions that act on a session ([`request`], [`set_refresh_token`],
//! [`handle_unauthorized`]) build the default client when none exists.
//! [`clear_auth_cache`] does not: a client that was never built has no cache
//! to clear, so it is a no-op until one is installed or built.
//!
//! Native builds keep the client in a process-wide slot. The browser client
//! is bound to its tab's event loop, so wasm32 builds keep it thread-local.

use crate::{ApiClient, ClientConfig, ClientError, RequestOptions};
use reqwest::Response;

#[cfg(not(target_arch = "wasm32"))]
mod slot {
    use crate::ApiClient;
    use once_cell::sync::Lazy;
    use std::sync::{PoisonError, RwLock};

    static DEFAULT_CLIENT: Lazy<RwLock<Option<ApiClient>>> = Lazy::new(|| RwLock::new(None));

    pub(super) fn get() -> Option<ApiClient> {
        DEFAULT_CLIENT
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn with<R>(f: impl FnOnce(&mut Option<ApiClient>) -> R) -> R {
        f(&mut DEFAULT_CLIENT
            .write()
            .unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(target_arch = "wasm32")]
mod slot {
    use crate::ApiClient;
    use std::cell::RefCell;

    thread_local! {
        static DEFAULT_CLIENT: RefCell<Option<ApiClient>> = const { RefCell::new(None) };
    }

    pub(super) fn get() -> Option<ApiClient> {
        DEFAULT_CLIENT.with(|slot| slot.borrow().clone())
    }

    pub(super) fn with<R>(f: impl FnOnce(&mut Option<ApiClient>) -> R) -> R {
        DEFAULT_CLIENT.with(|slot| f(&mut slot.borrow_mut()))
    }
}

/// Make `client` the process-wide default, returning the previous one
pub fn install(client: ApiClient) -> Option<ApiClient> {
    slot::with(|slot| slot.replace(client))
}

/// Remove the process-wide default client
pub fn uninstall() -> Option<ApiClient> {
    slot::with(Option::take)
}

/// Get the default client, building it on first use
pub fn default_client() -> Result<ApiClient, ClientError> {
    if let Some(client) = slot::get() {
        return Ok(client);
    }

    slot::with(|slot| {
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = ApiClient::from_config(ClientConfig::from_env()?)?;
        *slot = Some(client.clone());
        Ok(client)
    })
}

/// Resolve `path` against the default client's base URL
pub fn api_url(path: &str) -> String {
    slot::get().map_or_else(
        || {
            let config = ClientConfig::from_env().unwrap_or_default();
            crate::url::api_url(config.base_url.as_deref(), path)
        },
        |client| client.api_url(path),
    )
}

/// [`ApiClient::request`] on the default client
pub async fn request(path: &str, options: RequestOptions) -> Result<Response, ClientError> {
    default_client()?.request(path, options).await
}

/// [`ApiClient::set_refresh_token`] on the default client
pub fn set_refresh_token(token: Option<String>) -> Result<(), ClientError> {
    default_client()?.set_refresh_token(token);
    Ok(())
}

/// [`ApiClient::clear_auth_cache`] on the default client, if one exists
///
/// Returns whether a client was there to clear.
pub fn clear_auth_cache() -> bool {
    slot::get().is_some_and(|client| {
        client.clear_auth_cache();
        true
    })
}

/// [`ApiClient::handle_unauthorized`] on the default client
pub fn handle_unauthorized() {
    match default_client() {
        Ok(client) => client.handle_unauthorized(),
        Err(err) => warn!(error = %err, "No client available to handle unauthorized session"),
    }
}
