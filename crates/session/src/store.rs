//! Process-wide session store with idle expiry.
//!
//! Maps opaque session tokens to lock-protected [`SessionState`] entries.
//! The store is injected into the engine and the API layer rather than
//! living in ambient global state, so it can be constructed per test and
//! swapped for a durable backend later.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use crate::state::SessionState;

/// Shared handle to one session's state.
pub type SessionRef = Arc<Mutex<SessionState>>;

/// All live sessions, keyed by opaque token.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionRef>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for `token`, creating an empty one if absent.
    /// Idempotent for existing tokens.
    pub async fn get_or_create(&self, token: &str) -> SessionRef {
        if let Some(session) = self.get(token).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock; another request may have won.
        Arc::clone(
            sessions
                .entry(token.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(SessionState::new()))),
        )
    }

    /// Fetch the session for `token` if it exists.
    pub async fn get(&self, token: &str) -> Option<SessionRef> {
        self.sessions.read().await.get(token).map(Arc::clone)
    }

    /// Refresh `last_activity` if the session exists; no-op otherwise.
    pub async fn touch(&self, token: &str) {
        if let Some(session) = self.get(token).await {
            session.lock().await.touch();
        }
    }

    /// Hard-delete a session, eagerly freeing its image memory. Returns
    /// whether an entry was removed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Remove every session idle for longer than `ttl`. Returns the number
    /// of sessions evicted.
    ///
    /// Sessions whose mutex is currently held (a request or job task is
    /// mid-mutation) are skipped; they are active by definition and will be
    /// reconsidered on the next sweep. Exact TTL boundary races therefore
    /// cost at most one sweep interval, never a torn eviction.
    pub async fn purge_expired(&self, ttl: Duration) -> usize {
        self.purge_expired_at(Instant::now(), ttl).await
    }

    /// [`purge_expired`](Self::purge_expired) against an explicit clock
    /// reading, so expiry decisions are testable without waiting.
    pub async fn purge_expired_at(&self, now: Instant, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(state) => !state.is_expired(now, ttl),
            Err(_) => true,
        });

        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop all sessions. Called on graceful shutdown so photo data does
    /// not outlive the serving loop.
    pub async fn shutdown(&self) {
        self.sessions.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = SessionStore::new();
        let a = store.get_or_create("tok").await;
        let b = store.get_or_create("tok").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn touch_on_missing_token_is_a_noop() {
        let store = SessionStore::new();
        store.touch("ghost").await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn remove_deletes_the_entry() {
        let store = SessionStore::new();
        store.get_or_create("tok").await;
        assert!(store.remove("tok").await);
        assert!(!store.remove("tok").await);
        assert!(store.get("tok").await.is_none());
    }

    #[tokio::test]
    async fn purge_evicts_only_idle_sessions() {
        let store = SessionStore::new();
        let ttl = Duration::from_secs(600);
        let later = Instant::now() + Duration::from_secs(601);

        // "stale" keeps its creation-time activity; "fresh" is touched as
        // of the simulated sweep time.
        store.get_or_create("stale").await;
        let fresh = store.get_or_create("fresh").await;
        fresh.lock().await.last_activity = later;

        assert_eq!(store.purge_expired_at(later, ttl).await, 1);
        assert!(store.get("stale").await.is_none());
        assert!(store.get("fresh").await.is_some());
    }

    #[tokio::test]
    async fn purge_skips_sessions_whose_lock_is_held() {
        let store = SessionStore::new();
        let session = store.get_or_create("busy").await;
        let guard = session.lock().await;
        let later = Instant::now() + Duration::from_secs(601);

        // The lock is held, so the sweep must leave the session alone.
        assert_eq!(
            store.purge_expired_at(later, Duration::from_secs(600)).await,
            0
        );
        drop(guard);

        // Once released, the next sweep reclaims it.
        assert_eq!(
            store.purge_expired_at(later, Duration::from_secs(600)).await,
            1
        );
    }

    #[tokio::test]
    async fn expired_token_resolves_to_a_fresh_session() {
        let store = SessionStore::new();
        {
            let session = store.get_or_create("tok").await;
            session.lock().await.approved = true;
        }
        store
            .purge_expired_at(
                Instant::now() + Duration::from_secs(601),
                Duration::from_secs(600),
            )
            .await;

        let session = store.get_or_create("tok").await;
        assert!(!session.lock().await.approved);
    }

    #[tokio::test]
    async fn shutdown_clears_everything() {
        let store = SessionStore::new();
        store.get_or_create("a").await;
        store.get_or_create("b").await;
        store.shutdown().await;
        assert!(store.is_empty().await);
    }
}
