//! Signal Routes
//!
//! Each route delivers one signal to a request-scoped dashboard control,
//! persists the resulting view back into the session, and then either renders
//! the active view or returns the control's JSON acknowledgment.
//!
//! - POST   /dashboard/view/:view - switch between the two views
//! - POST   /dashboard/widgets - insert a widget
//! - DELETE /dashboard/widgets/:id - remove a widget
//! - POST   /dashboard/widgets/:id/move - reorder a widget
//! - POST   /dashboard/widgets/:id/signal - signal addressed to one widget

use crate::api::dto::{InsertWidgetRequest, MoveWidgetRequest, WidgetSignalRequest};
use crate::api::error::ApiResult;
use crate::api::routes::session_id;
use crate::api::state::AppState;
use crate::control::{DashboardControl, Signal, SignalOutcome, View};
use crate::widgets::{WidgetId, WidgetTypeId};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Deliver one signal and finish the request: persist the view, then either
/// return the ack or render. An ack terminates the request without any
/// rendering.
async fn run_signal(
    state: &AppState,
    session: &str,
    mut control: DashboardControl,
    signal: Signal,
) -> ApiResult<Response> {
    let outcome = control.handle(signal).await?;
    state.sessions.set_view(session, control.view()).await;

    match outcome {
        SignalOutcome::Ack(payload) => Ok(Json(payload).into_response()),
        SignalOutcome::Render => {
            let rendered = control.render().await?;
            Ok(Html(rendered.html).into_response())
        }
    }
}

/// POST /dashboard/view/:view
///
/// Switch between the two views. Only `default` and `edit` parse; anything
/// else is rejected before a signal is built.
pub async fn switch_view(
    State(state): State<Arc<AppState>>,
    Path(view): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let signal = match view.parse::<View>()? {
        View::Default => Signal::ShowDashboard,
        View::Edit => Signal::ShowEdit,
    };
    let session = session_id(&state, &query);
    let control = state.control_for(&session).await;
    run_signal(&state, &session, control, signal).await
}

/// POST /dashboard/widgets
///
/// Insert a new widget. The response is the single-widget partial update for
/// the freshly inserted widget, with the full catalog attached.
pub async fn insert_widget(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    Json(req): Json<InsertWidgetRequest>,
) -> ApiResult<Response> {
    let session = session_id(&state, &query);
    let control = state.control_for(&session).await;
    let signal = Signal::InsertWidget {
        widget_type: WidgetTypeId::new(req.widget_type_id),
        before: req.before_widget_id.map(WidgetId::new),
    };
    run_signal(&state, &session, control, signal).await
}

/// DELETE /dashboard/widgets/:id
///
/// Remove a widget. Failures are absorbed by the control: the edit view is
/// rendered with a flash notice, never an error response.
pub async fn remove_widget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let session = session_id(&state, &query);
    let control = state.control_for(&session).await;
    let signal = Signal::RemoveWidget {
        widget: WidgetId::new(id),
    };
    run_signal(&state, &session, control, signal).await
}

/// POST /dashboard/widgets/:id/move
///
/// Reorder a widget. On success the response is the empty JSON acknowledgment
/// and nothing is rendered.
pub async fn move_widget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(req): Json<MoveWidgetRequest>,
) -> ApiResult<Response> {
    let session = session_id(&state, &query);
    let control = state.control_for(&session).await;
    let signal = Signal::MoveWidgetBefore {
        widget: WidgetId::new(id),
        related: req.related_widget_id.map(WidgetId::new),
    };
    run_signal(&state, &session, control, signal).await
}

/// POST /dashboard/widgets/:id/signal
///
/// Deliver a signal to a single widget. The widget becomes the request's
/// signal receiver, so an edit-view render produces its partial update and
/// saves its state.
pub async fn widget_signal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(req): Json<WidgetSignalRequest>,
) -> ApiResult<Response> {
    let session = session_id(&state, &query);
    let widget = WidgetId::new(id);

    let mut control = state.control_for(&session).await;
    control
        .dispatch_widget_signal(&widget, &req.signal, &req.args)
        .await?;
    state.sessions.set_view(&session, control.view()).await;

    let rendered = control.render().await?;
    Ok(Html(rendered.html).into_response())
}
