//! # Widgetboard
//!
//! A server-side dashboard widget control: it renders a user's dashboard of
//! widgets, offers an edit mode for adding, removing and reordering them, and
//! produces partial single-widget updates for AJAX-style in-place
//! replacement.
//!
//! The control is deliberately thin. Widget ordering, persistence and the
//! available-widget catalog live behind the [`widgets::WidgetManager`] seam;
//! rendering lives behind [`control::DashboardTemplates`]. The crate ships an
//! in-memory manager, plain HTML templates and an Axum host layer so the
//! whole flow runs end to end out of the box.
//!
//! ## Modules
//!
//! - [`control`]: the dashboard control - views, signals, partial rendering
//! - [`widgets`]: widget identity, the component trait and the manager seam
//! - [`templates`]: default HTML implementation of the template seam
//! - [`api`]: HTTP host layer with per-session view persistence
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use widgetboard::api::{serve, ApiConfig, AppState};
//! use widgetboard::templates::HtmlTemplates;
//! use widgetboard::widgets::{
//!     InMemoryWidgetManager, NoteWidget, WidgetHandle, WidgetId, WidgetTypeId,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = Arc::new(InMemoryWidgetManager::new());
//!     manager
//!         .register_widget_type(
//!             WidgetTypeId::new("note"),
//!             Arc::new(|_id: &WidgetId| Arc::new(NoteWidget::new("Hello")) as WidgetHandle),
//!         )
//!         .await;
//!
//!     let config = ApiConfig::default();
//!     let state = AppState::new(manager, Arc::new(HtmlTemplates::new()), config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod control;
pub mod templates;
pub mod widgets;

// Re-export top-level types for convenience
pub use control::{
    ControlError, DashboardControl, DashboardTemplates, Flash, RenderMode, RenderedView, Signal,
    SignalOutcome, TemplateError, TemplateVars, View,
};

pub use widgets::{
    InMemoryWidgetManager, WidgetComponent, WidgetError, WidgetHandle, WidgetId, WidgetManager,
    WidgetResult, WidgetTypeId,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState, SessionStore};

pub use config::{Config, ConfigError, DashboardConfig, LoggingConfig, ServerConfig};

pub use templates::HtmlTemplates;
