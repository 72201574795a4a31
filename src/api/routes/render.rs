//! Render Route
//!
//! - GET /dashboard - render the session's active view

use crate::api::error::ApiResult;
use crate::api::routes::session_id;
use crate::api::state::AppState;
use axum::{
    extract::{Query, State},
    response::Html,
};
use std::collections::HashMap;
use std::sync::Arc;

/// GET /dashboard
///
/// Render the view persisted for the session: the read-only dashboard or the
/// edit view. Always a full-page render; partial updates only happen in
/// response to signals.
pub async fn render_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    let session = session_id(&state, &query);
    let mut control = state.control_for(&session).await;
    let rendered = control.render().await?;
    Ok(Html(rendered.html))
}
