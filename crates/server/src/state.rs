//! Application state shared across handlers.

use std::sync::Arc;

use hackvote_core::VotePolicy;

use crate::db::VoteStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// vote store and the deployment's vote policy.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn VoteStore>,
    policy: VotePolicy,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Backend holding projects, votes and registrations
    /// * `policy` - Duplicate-vote policy applied to every vote
    #[must_use]
    pub fn new(store: Arc<dyn VoteStore>, policy: VotePolicy) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, policy }),
        }
    }

    /// Get a reference to the vote store.
    #[must_use]
    pub fn store(&self) -> &dyn VoteStore {
        self.inner.store.as_ref()
    }

    /// Get the configured vote policy.
    #[must_use]
    pub fn policy(&self) -> VotePolicy {
        self.inner.policy
    }
}
