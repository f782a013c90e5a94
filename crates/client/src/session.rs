//! Session state held by one client instance
//!
//! Two slots live here: the cached refresh token and the in-flight refresh
//! marker. The marker is a [`Shared`] future. Every caller that needs a
//! refresh while one is running awaits the same future, so the backend sees
//! at most one refresh call at a time. Locks are held only to read or swap a
//! slot, never across an await.

use crate::platform::PlatformFuture;
use futures::future::{FutureExt, Shared};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outcome of a refresh, shared by every caller that joined it
pub(crate) type SharedRefresh = Shared<PlatformFuture<bool>>;

struct InFlight {
    id: u64,
    refresh: SharedRefresh,
}

#[derive(Default)]
struct Slots {
    in_flight: Option<InFlight>,
    next_id: u64,
}

/// Refresh-token cache and in-flight refresh marker
#[derive(Default)]
pub struct SessionState {
    refresh_token: Mutex<Option<String>>,
    refresh: Mutex<Slots>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("has_refresh_token", &self.refresh_token().is_some())
            .field("refresh_in_flight", &self.refresh_in_flight())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently cached refresh token
    pub fn refresh_token(&self) -> Option<String> {
        lock(&self.refresh_token).clone()
    }

    /// Replace the cached refresh token; `None` or an empty token clears it
    pub fn set_refresh_token(&self, token: Option<String>) {
        *lock(&self.refresh_token) = token.filter(|t| !t.is_empty());
    }

    /// Drop the cached refresh token
    pub fn clear(&self) {
        *lock(&self.refresh_token) = None;
    }

    /// Whether a refresh call is currently outstanding
    pub fn refresh_in_flight(&self) -> bool {
        lock(&self.refresh).in_flight.is_some()
    }

    /// Forget the cached token and any in-flight refresh
    ///
    /// Callers already awaiting a refresh still receive its outcome.
    pub fn reset(&self) {
        self.clear();
        lock(&self.refresh).in_flight = None;
    }

    /// Join the outstanding refresh, or install one built by `start`
    ///
    /// `start` receives the id the new refresh must pass to
    /// [`Self::finish_refresh`] once it completes. It is only called when no
    /// refresh is outstanding.
    pub(crate) fn join_or_start<F>(&self, start: F) -> SharedRefresh
    where
        F: FnOnce(u64) -> PlatformFuture<bool>,
    {
        let mut slots = lock(&self.refresh);
        if let Some(in_flight) = &slots.in_flight {
            trace!(id = in_flight.id, "Joining in-flight session refresh");
            return in_flight.refresh.clone();
        }

        let id = slots.next_id;
        slots.next_id = slots.next_id.wrapping_add(1);
        let refresh = start(id).shared();
        slots.in_flight = Some(InFlight {
            id,
            refresh: refresh.clone(),
        });
        refresh
    }

    /// Clear the in-flight marker if it still belongs to refresh `id`
    pub(crate) fn finish_refresh(&self, id: u64) {
        let mut slots = lock(&self.refresh);
        if slots.in_flight.as_ref().is_some_and(|f| f.id == id) {
            slots.in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cache() {
        let session = SessionState::new();
        assert!(session.refresh_token().is_none());

        session.set_refresh_token(Some("rt-1".into()));
        assert_eq!(session.refresh_token().as_deref(), Some("rt-1"));

        session.set_refresh_token(Some(String::new()));
        assert!(session.refresh_token().is_none());

        session.set_refresh_token(Some("rt-2".into()));
        session.clear();
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = SessionState::new();
        session.set_refresh_token(Some("secret-token".into()));
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("has_refresh_token: true"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        use crate::platform::boxed;
        use futures::channel::oneshot;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let session = Arc::new(SessionState::new());
        let started = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<bool>();
        let mut rx = Some(rx);

        let mut join = || {
            let session_for_finish = session.clone();
            let started = started.clone();
            let rx = &mut rx;
            session.join_or_start(move |id| {
                started.fetch_add(1, Ordering::SeqCst);
                let rx = rx.take().unwrap();
                boxed(async move {
                    let ok = rx.await.unwrap_or(false);
                    session_for_finish.finish_refresh(id);
                    ok
                })
            })
        };

        let first = join();
        let second = join();
        assert!(session.refresh_in_flight());
        assert_eq!(started.load(Ordering::SeqCst), 1);

        tx.send(true).unwrap();
        let (a, b) = tokio::join!(first, second);
        assert!(a && b);
        assert!(!session.refresh_in_flight());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_stale_refresh_does_not_clear_newer_marker() {
        use crate::platform::boxed;

        let session = SessionState::new();
        let first = session.join_or_start(|_| boxed(async { false }));
        session.reset();
        let _second = session.join_or_start(|_| boxed(futures::future::pending()));

        // The first refresh finishes with id 0; the marker now belongs to id 1
        session.finish_refresh(0);
        assert!(!first.await);
        assert!(session.refresh_in_flight());
    }
}
