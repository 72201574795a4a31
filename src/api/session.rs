//! Session Store
//!
//! Persists the dashboard view parameter across requests, keyed by session
//! id. This is the host-side half of the persisted-parameter pattern: routes
//! load the view into the control before handling and write it back after.

use crate::control::View;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Session id used when a request carries none.
pub const DEFAULT_SESSION: &str = "default";

/// In-memory per-session view state.
#[derive(Default)]
pub struct SessionStore {
    views: RwLock<HashMap<String, View>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// View persisted for a session; unseen sessions start on the dashboard.
    pub async fn view(&self, session_id: &str) -> View {
        self.views
            .read()
            .await
            .get(session_id)
            .copied()
            .unwrap_or_default()
    }

    /// Persist the view for a session.
    pub async fn set_view(&self, session_id: &str, view: View) {
        self.views
            .write()
            .await
            .insert(session_id.to_string(), view);
    }

    /// Number of sessions with persisted state.
    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.views.read().await.is_empty()
    }
}
