//! Host environment capabilities
//!
//! The client never touches `window` directly. Navigation, reloads and
//! background tasks go through a [`Platform`], so the same client runs inside
//! the browser console, under server-side rendering, and in tests.

use std::future::Future;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebPlatform;

/// Boxed future that can be handed to the host executor
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformFuture<T> = futures::future::BoxFuture<'static, T>;

/// Boxed future that can be handed to the host executor
#[cfg(target_arch = "wasm32")]
pub type PlatformFuture<T> = futures::future::LocalBoxFuture<'static, T>;

/// Task spawned without anyone awaiting its completion
pub type DetachedTask = PlatformFuture<()>;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn boxed<T, F>(future: F) -> PlatformFuture<T>
where
    F: Future<Output = T> + Send + 'static,
{
    use futures::FutureExt;
    future.boxed()
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn boxed<T, F>(future: F) -> PlatformFuture<T>
where
    F: Future<Output = T> + 'static,
{
    use futures::FutureExt;
    future.boxed_local()
}

/// Capabilities of the environment hosting the console
#[cfg_attr(test, mockall::automock)]
pub trait Platform: Send + Sync {
    /// Whether a user-facing session exists (a browser window)
    ///
    /// Session refresh and forced logout only run when this is true.
    fn is_interactive(&self) -> bool;

    /// Current location path, if known
    fn current_path(&self) -> Option<String>;

    /// Navigate to `path`, replacing the current page
    fn navigate(&self, path: &str);

    /// Reload the current page from scratch
    fn reload(&self);

    /// Run `task` in the background without awaiting it
    fn spawn_detached(&self, task: DetachedTask);
}

/// Platform for non-browser embeddings such as server-side rendering
///
/// Nothing is interactive, so refresh fails fast and escalation is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl Platform for HeadlessPlatform {
    fn is_interactive(&self) -> bool {
        false
    }

    fn current_path(&self) -> Option<String> {
        None
    }

    fn navigate(&self, path: &str) {
        debug!(path, "Ignoring navigation without a browser context");
    }

    fn reload(&self) {
        debug!("Ignoring reload without a browser context");
    }

    fn spawn_detached(&self, _task: DetachedTask) {
        debug!("Dropping background task without a browser context");
    }
}

/// Platform used when the caller does not supply one
#[cfg(not(target_arch = "wasm32"))]
pub fn default_platform() -> std::sync::Arc<dyn Platform> {
    std::sync::Arc::new(HeadlessPlatform)
}

/// Platform used when the caller does not supply one
#[cfg(target_arch = "wasm32")]
pub fn default_platform() -> std::sync::Arc<dyn Platform> {
    std::sync::Arc::new(WebPlatform)
}
