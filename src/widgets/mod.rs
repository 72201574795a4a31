//! Widget Domain
//!
//! Core widget types and the manager seam the dashboard control is built
//! against:
//! - [`WidgetId`] / [`WidgetTypeId`]: opaque identifiers for widget instances
//!   and widget types
//! - [`WidgetComponent`]: a live widget able to render its fragment and handle
//!   inbound signals
//! - [`WidgetManager`]: ordering, persistence and the available-widget catalog,
//!   owned by the host application
//!
//! The control never creates or destroys widget identity itself; it only
//! requests mutations through the manager.

mod builtin;
mod memory;

pub use builtin::{ClockWidget, NoteWidget};
pub use memory::{InMemoryWidgetManager, WidgetFactory};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a widget instance belonging to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty id, which signal payloads use to mean "no widget".
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque identifier of a widget type available for insertion.
///
/// Doubles as the catalog key under which the type's preview component is
/// exposed in edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetTypeId(String);

impl WidgetTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetTypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A live widget component attached to the dashboard's component tree.
///
/// Implementations keep their own interior state; `handle_signal` takes
/// `&self` so a shared instance can be driven from the tree.
pub trait WidgetComponent: Send + Sync {
    /// The type this instance was created from.
    fn widget_type(&self) -> WidgetTypeId;

    /// Render this widget's HTML fragment.
    fn render(&self) -> String;

    /// Handle a signal addressed to this widget.
    fn handle_signal(
        &self,
        signal: &str,
        args: &HashMap<String, String>,
    ) -> Result<(), WidgetError>;

    /// Snapshot of the widget's persisted configuration, saved back through
    /// the manager after a signal-driven update.
    fn state(&self) -> serde_json::Value {
        serde_json::Value::Object(serde_json::Map::new())
    }
}

/// Shared handle to a live widget component.
pub type WidgetHandle = Arc<dyn WidgetComponent>;

/// Widget ordering, persistence and catalog, owned by the host application.
///
/// The ordered user list and the catalog keep their own ordering; the control
/// exposes both to templates in the order returned here.
#[async_trait]
pub trait WidgetManager: Send + Sync {
    /// Ordered ids of the widgets on the current user's dashboard.
    async fn user_widget_ids(&self) -> Result<Vec<WidgetId>, WidgetError>;

    /// The catalog of widget types available for insertion, each with a
    /// preview component, in catalog order.
    async fn available_widgets(&self) -> Result<Vec<(WidgetTypeId, WidgetHandle)>, WidgetError>;

    /// Live component for one of the user's widgets.
    async fn single_widget_instance(&self, id: &WidgetId) -> Result<WidgetHandle, WidgetError>;

    /// Insert a new widget of the given type, positioned before
    /// `before_widget_id` when given, otherwise at the default position.
    /// Returns the id of the new widget.
    async fn insert_widget(
        &self,
        widget_type: &WidgetTypeId,
        before_widget_id: Option<&WidgetId>,
    ) -> Result<WidgetId, WidgetError>;

    /// Remove a widget from the user's dashboard.
    async fn remove_widget(&self, id: &WidgetId) -> Result<(), WidgetError>;

    /// Reorder a widget to sit before `related_widget_id`, or to the end when
    /// no related widget is given.
    async fn move_widget_before(
        &self,
        id: &WidgetId,
        related_widget_id: Option<&WidgetId>,
    ) -> Result<(), WidgetError>;

    /// Persist the widget's current configuration snapshot.
    async fn save_widget_state(
        &self,
        id: &WidgetId,
        widget: &WidgetHandle,
    ) -> Result<(), WidgetError>;
}

/// Errors surfaced by widget managers and widget components.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Unknown widget: {0}")]
    UnknownWidget(WidgetId),

    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(WidgetTypeId),

    #[error("Unknown widget signal: {0}")]
    UnknownSignal(String),

    #[error("Missing signal argument: {0}")]
    MissingArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for widget manager operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
