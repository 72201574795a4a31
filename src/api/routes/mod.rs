//! API route handlers

pub mod health;
pub mod render;
pub mod signals;

use super::session::DEFAULT_SESSION;
use super::state::AppState;
use std::collections::HashMap;

/// Session id from the request's query string, falling back to the shared
/// default session.
pub(crate) fn session_id(state: &AppState, query: &HashMap<String, String>) -> String {
    query
        .get(&state.config.session_param)
        .filter(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_SESSION.to_string())
}
