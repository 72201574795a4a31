//! Dashboard Control
//!
//! The single UI control of this crate. It renders a user's dashboard of
//! widgets, offers an edit view for adding/removing/reordering them, and
//! produces single-widget partial updates when one widget received a signal or
//! was just inserted.
//!
//! The control is a thin orchestration layer: widget state lives behind the
//! [`WidgetManager`] seam and rendering behind [`DashboardTemplates`]. One
//! control instance serves one request; the host constructs it with the view
//! persisted for the session and reads the view back after handling.

pub mod component;
pub mod template;

pub use component::{
    catalog_component_name, widget_component_name, ComponentError, ComponentTree,
    CATALOG_COMPONENT_PREFIX, WIDGET_COMPONENT_PREFIX,
};
pub use template::{DashboardTemplates, RenderMode, RenderedView, TemplateError, TemplateVars};

use crate::widgets::{WidgetError, WidgetHandle, WidgetId, WidgetManager, WidgetTypeId};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// User-facing notice for a failed widget removal.
const REMOVE_FAILED_NOTICE: &str =
    "Widget could not be removed. Please, try to reload current page.";

/// User-facing notice for a failed widget move.
const MOVE_FAILED_NOTICE: &str = "Widget could not be moved. Please, try to reload current page.";

/// Which of the two views the control renders. Persisted per session across
/// requests by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Default,
    Edit,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Default => "default",
            View::Edit => "edit",
        }
    }
}

impl FromStr for View {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(View::Default),
            "edit" => Ok(View::Edit),
            other => Err(ControlError::UnknownView(other.to_string())),
        }
    }
}

/// An inbound signal addressed to the control itself.
#[derive(Debug, Clone)]
pub enum Signal {
    /// Switch to the read-only dashboard view.
    ShowDashboard,
    /// Switch to the edit view.
    ShowEdit,
    /// Insert a new widget, optionally before an existing one. An empty
    /// `before` id is normalized to "default position".
    InsertWidget {
        widget_type: WidgetTypeId,
        before: Option<WidgetId>,
    },
    /// Remove a widget from the dashboard.
    RemoveWidget { widget: WidgetId },
    /// Reorder a widget before another. An empty `related` id is normalized
    /// to "move to the end".
    MoveWidgetBefore {
        widget: WidgetId,
        related: Option<WidgetId>,
    },
}

/// What the dispatcher should do after a signal was handled.
///
/// `Ack` terminates the request with a structured JSON body and no rendering;
/// it replaces exception-based request aborts, so an early termination can
/// never be swallowed by error handling further down.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalOutcome {
    /// Continue by rendering the active view.
    Render,
    /// Respond immediately with this JSON payload; no rendering follows.
    Ack(serde_json::Value),
}

/// A dismissible user notice collected during signal handling and exposed to
/// the template of the same response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flash {
    pub message: String,
    /// CSS class of the notice.
    pub class: String,
}

impl Flash {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            class: "alert-danger".to_string(),
        }
    }
}

/// Per-request render-selection state.
///
/// Precondition: at most one widget is the signal target of a request. The
/// context holds a single optional target, set by the host before dispatch,
/// so the receiver determination cannot depend on widget materialization
/// order.
#[derive(Debug, Default)]
pub struct RequestContext {
    /// Widget the inbound signal is addressed to, if any.
    signal_target: Option<WidgetId>,
    /// Recorded once the target widget was actually materialized.
    signal_receiver: Option<WidgetId>,
    /// Widget inserted during this request, if any.
    inserted_widget: Option<WidgetId>,
}

impl RequestContext {
    fn note_materialized(&mut self, id: &WidgetId) {
        if self.signal_target.as_ref() == Some(id) {
            self.signal_receiver = Some(id.clone());
        }
    }
}

/// Errors escaping the control. Widget-manager failures in the remove/move
/// handlers never reach here; they are logged and turned into flash notices.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// The dashboard widget control. One instance per request.
pub struct DashboardControl {
    manager: Arc<dyn WidgetManager>,
    templates: Arc<dyn DashboardTemplates>,
    /// Identifier exposed to templates for client-side fragment targeting.
    unique_id: String,
    view: View,
    ctx: RequestContext,
    tree: ComponentTree,
    flashes: Vec<Flash>,
}

impl DashboardControl {
    pub fn new(
        manager: Arc<dyn WidgetManager>,
        templates: Arc<dyn DashboardTemplates>,
        unique_id: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            templates,
            unique_id: unique_id.into(),
            view: View::Default,
            ctx: RequestContext::default(),
            tree: ComponentTree::new(),
            flashes: Vec::new(),
        }
    }

    /// Restore the view persisted for the session.
    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Notices collected while handling the current request.
    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    /// Components attached during the current request.
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Handle a signal addressed to the control.
    pub async fn handle(&mut self, signal: Signal) -> Result<SignalOutcome, ControlError> {
        match signal {
            Signal::ShowDashboard => {
                self.view = View::Default;
                Ok(SignalOutcome::Render)
            }
            Signal::ShowEdit => {
                self.view = View::Edit;
                Ok(SignalOutcome::Render)
            }
            Signal::InsertWidget {
                widget_type,
                before,
            } => {
                let before = before.filter(|id| !id.is_empty());
                let id = self
                    .manager
                    .insert_widget(&widget_type, before.as_ref())
                    .await?;
                tracing::info!(widget = %id, widget_type = %widget_type, "widget inserted");
                self.ctx.inserted_widget = Some(id);
                Ok(SignalOutcome::Render)
            }
            Signal::RemoveWidget { widget } => {
                if let Err(e) = self.manager.remove_widget(&widget).await {
                    tracing::error!(widget = %widget, error = %e, "failed to remove widget");
                    self.flashes.push(Flash::danger(REMOVE_FAILED_NOTICE));
                }
                self.view = View::Edit;
                Ok(SignalOutcome::Render)
            }
            Signal::MoveWidgetBefore { widget, related } => {
                let related = related.filter(|id| !id.is_empty());
                match self.manager.move_widget_before(&widget, related.as_ref()).await {
                    Ok(()) => Ok(SignalOutcome::Ack(json!({}))),
                    Err(e) => {
                        tracing::error!(widget = %widget, error = %e, "failed to move widget");
                        self.flashes.push(Flash::danger(MOVE_FAILED_NOTICE));
                        Ok(SignalOutcome::Render)
                    }
                }
            }
        }
    }

    /// Deliver a signal addressed to one of the user's widgets. The widget is
    /// materialized first, which marks it as this request's signal receiver;
    /// the following render then produces its partial update in edit view.
    pub async fn dispatch_widget_signal(
        &mut self,
        widget: &WidgetId,
        signal: &str,
        args: &HashMap<String, String>,
    ) -> Result<(), ControlError> {
        self.ctx.signal_target = Some(widget.clone());
        let instance = self.widget_component(widget).await?;
        instance.handle_signal(signal, args)?;
        Ok(())
    }

    /// Lazily materialize the component for a user widget id, attaching it to
    /// the tree under `widget-<id>` on first use.
    pub async fn widget_component(&mut self, id: &WidgetId) -> Result<WidgetHandle, ControlError> {
        let name = widget_component_name(id);
        if let Some(existing) = self.tree.get(&name) {
            return Ok(Arc::clone(existing));
        }
        let instance = self.manager.single_widget_instance(id).await?;
        self.tree.attach(name, Arc::clone(&instance))?;
        self.ctx.note_materialized(id);
        Ok(instance)
    }

    /// Render the active view.
    pub async fn render(&mut self) -> Result<RenderedView, ControlError> {
        match self.view {
            View::Default => self.render_default().await,
            View::Edit => self.render_edit().await,
        }
    }

    async fn render_default(&mut self) -> Result<RenderedView, ControlError> {
        let ids = self.manager.user_widget_ids().await?;
        for id in &ids {
            self.widget_component(id).await?;
        }

        let mut vars = self.base_vars();
        vars.set("user_widget_ids", &ids);
        self.templates.prepare_dashboard(&mut vars);

        let html = self.templates.render(RenderMode::Dashboard, &vars, &self.tree)?;
        Ok(RenderedView {
            mode: RenderMode::Dashboard,
            html,
            updated_widget: None,
        })
    }

    async fn render_edit(&mut self) -> Result<RenderedView, ControlError> {
        // The signal receiver wins over a freshly inserted widget when both
        // are present.
        let widget_to_update = self
            .ctx
            .signal_receiver
            .clone()
            .or_else(|| self.ctx.inserted_widget.clone());

        match widget_to_update {
            Some(id) => self.render_single_widget(id).await,
            None => self.render_edit_full().await,
        }
    }

    async fn render_single_widget(&mut self, id: WidgetId) -> Result<RenderedView, ControlError> {
        let signal_driven = self.ctx.signal_receiver.is_some();

        let mut vars = self.base_vars();
        vars.set("user_widget_ids", Vec::<WidgetId>::new());
        vars.set("updated_widget_id", &id);

        let instance = self.widget_component(&id).await?;

        if signal_driven {
            // Only this widget's configuration changed; persist it and leave
            // the catalog out of the payload.
            vars.set("available_widgets", Vec::<WidgetTypeId>::new());
            self.manager.save_widget_state(&id, &instance).await?;
        } else {
            // The insert changed the control's own state, so the full catalog
            // is attached and exposed alongside the new widget.
            let keys = self.attach_catalog().await?;
            vars.set("available_widgets", &keys);
        }

        vars.set("unique_id", self.unique_id.clone());
        self.templates.prepare_single_widget(&mut vars, &id, signal_driven);

        let html = self
            .templates
            .render(RenderMode::SingleWidget, &vars, &self.tree)?;
        Ok(RenderedView {
            mode: RenderMode::SingleWidget,
            html,
            updated_widget: Some(id),
        })
    }

    async fn render_edit_full(&mut self) -> Result<RenderedView, ControlError> {
        let ids = self.manager.user_widget_ids().await?;
        for id in &ids {
            self.widget_component(id).await?;
        }

        let mut vars = self.base_vars();
        vars.set("user_widget_ids", &ids);

        let keys = self.attach_catalog().await?;
        vars.set("available_widgets", &keys);

        vars.set("unique_id", self.unique_id.clone());
        self.templates.prepare_edit(&mut vars);

        let html = self.templates.render(RenderMode::EditFull, &vars, &self.tree)?;
        Ok(RenderedView {
            mode: RenderMode::EditFull,
            html,
            updated_widget: None,
        })
    }

    /// Attach every catalog entry under its `wa`-prefixed name and return the
    /// catalog keys in catalog order.
    async fn attach_catalog(&mut self) -> Result<Vec<WidgetTypeId>, ControlError> {
        let catalog = self.manager.available_widgets().await?;
        let mut keys = Vec::with_capacity(catalog.len());
        for (widget_type, component) in catalog {
            self.tree
                .attach(catalog_component_name(&widget_type), component)?;
            keys.push(widget_type);
        }
        Ok(keys)
    }

    fn base_vars(&self) -> TemplateVars {
        let mut vars = TemplateVars::new();
        vars.set("flashes", &self.flashes);
        vars
    }
}
