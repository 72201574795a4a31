//! Widgetboard HTTP API
//!
//! Host layer for the dashboard control, built with Axum. Routes translate
//! HTTP requests into control signals, round-trip the persisted view through
//! the session store, and return either rendered HTML or the control's JSON
//! acknowledgment.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /dashboard` - render the session's active view
//! - `POST /dashboard/view/:view` - switch views (`default` or `edit`)
//! - `POST /dashboard/widgets` - insert a widget
//! - `DELETE /dashboard/widgets/:id` - remove a widget
//! - `POST /dashboard/widgets/:id/move` - reorder a widget
//! - `POST /dashboard/widgets/:id/signal` - signal one widget
//!
//! ## Health
//! - `GET /health/live` - liveness probe
//! - `GET /health` - full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use session::{SessionStore, DEFAULT_SESSION};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/", get(routes::render::render_dashboard))
        .route("/view/:view", post(routes::signals::switch_view))
        .route("/widgets", post(routes::signals::insert_widget))
        .route("/widgets/:id", delete(routes::signals::remove_widget))
        .route("/widgets/:id/move", post(routes::signals::move_widget))
        .route("/widgets/:id/signal", post(routes::signals::widget_signal));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/dashboard", dashboard_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Widgetboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Widgetboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::HtmlTemplates;
    use crate::widgets::{
        ClockWidget, InMemoryWidgetManager, NoteWidget, WidgetHandle, WidgetId, WidgetManager,
        WidgetTypeId,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    async fn create_test_app() -> (Router, Vec<WidgetId>) {
        let manager = Arc::new(InMemoryWidgetManager::new());
        manager
            .register_widget_type(
                WidgetTypeId::new("note"),
                Arc::new(|_id: &WidgetId| Arc::new(NoteWidget::new("a note")) as WidgetHandle),
            )
            .await;
        manager
            .register_widget_type(
                WidgetTypeId::new("clock"),
                Arc::new(|_id: &WidgetId| Arc::new(ClockWidget) as WidgetHandle),
            )
            .await;

        let first = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let second = manager
            .insert_widget(&WidgetTypeId::new("clock"), None)
            .await
            .unwrap();

        let state = AppState::new(
            manager,
            Arc::new(HtmlTemplates::new()),
            ApiConfig::default(),
        );
        (build_router(state), vec![first, second])
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_render_dashboard_default_view() {
        let (app, widgets) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("class=\"dashboard\""));
        for id in &widgets {
            assert!(body.contains(&format!("widget-{}", id)));
        }
        // The read-only dashboard carries no catalog.
        assert!(!body.contains("widget-catalog"));
    }

    #[tokio::test]
    async fn test_edit_view_persists_across_requests() {
        let (app, _) = create_test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/edit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("dashboard-edit"));
        assert!(body.contains("widget-catalog"));

        // The same session renders the edit view on a plain GET afterwards.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("dashboard-edit"));
    }

    #[tokio::test]
    async fn test_switch_to_unknown_view_is_rejected() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/sideways")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("UNKNOWN_VIEW"));
    }

    #[tokio::test]
    async fn test_switch_back_to_default_view() {
        let (app, _) = create_test_app().await;

        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/edit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/default")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(!body.contains("dashboard-edit"));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (app, _) = create_test_app().await;

        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/edit?session=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard?session=bob")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(!body.contains("dashboard-edit"));
    }

    #[tokio::test]
    async fn test_insert_widget_returns_partial_update() {
        let (app, _) = create_test_app().await;

        // Inserting happens from the edit view; enter it first.
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/edit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/widgets")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"widget_type_id": "note"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("widget-update"));
        assert!(body.contains("data-reason=\"insert\""));
        // Insert-driven updates expose the full catalog.
        assert!(body.contains("data-widget-type=\"note\""));
        assert!(body.contains("data-widget-type=\"clock\""));
    }

    #[tokio::test]
    async fn test_insert_unknown_type_is_an_error() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/widgets")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"widget_type_id": "missing"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_unknown_widget_renders_flash() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/dashboard/widgets/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Failures are absorbed: the edit view renders with a notice.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("alert-danger"));
        assert!(body.contains("Widget could not be removed"));
        assert!(body.contains("dashboard-edit"));
    }

    #[tokio::test]
    async fn test_remove_widget_renders_edit_view() {
        let (app, widgets) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/dashboard/widgets/{}", widgets[0]))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("dashboard-edit"));
        assert!(!body.contains(&format!("widget-{}", widgets[0])));
        assert!(!body.contains("alert-danger"));
    }

    #[tokio::test]
    async fn test_move_widget_acks_with_empty_json() {
        let (app, widgets) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/dashboard/widgets/{}/move", widgets[1]))
                    .header("Content-Type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"related_widget_id": "{}"}}"#,
                        widgets[0]
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn test_move_unknown_widget_renders_flash() {
        let (app, _) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/widgets/missing/move")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Widget could not be moved"));
    }

    #[tokio::test]
    async fn test_widget_signal_renders_partial_update_in_edit_view() {
        let (app, widgets) = create_test_app().await;

        // Enter edit view first so the signal produces a partial update.
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dashboard/view/edit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/dashboard/widgets/{}/signal", widgets[0]))
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"signal": "set-note", "args": {"text": "updated text"}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("widget-update"));
        assert!(body.contains("data-reason=\"signal\""));
        assert!(body.contains("updated text"));
        // Signal-driven updates expose no catalog entries.
        assert!(!body.contains("catalog-entry"));
    }

    #[tokio::test]
    async fn test_widget_signal_with_unknown_signal_is_an_error() {
        let (app, widgets) = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/dashboard/widgets/{}/signal", widgets[0]))
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"signal": "bogus"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
