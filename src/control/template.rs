//! Template Seam
//!
//! The dashboard control fills a named-variable bag and hands it to a
//! [`DashboardTemplates`] implementation together with the component tree.
//! Three prepare hooks let the host add view-specific variables before the
//! final render, one per render mode.

use super::component::ComponentTree;
use crate::widgets::WidgetId;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Which template is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Read-only dashboard, always full-page.
    Dashboard,
    /// Full edit view: all user widgets plus the catalog.
    EditFull,
    /// Partial update of a single widget's fragment.
    SingleWidget,
}

/// Named variables exposed to a template.
#[derive(Debug, Default, Clone)]
pub struct TemplateVars {
    vars: BTreeMap<String, Value>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// String-array variable decoded back into owned strings. Missing or
    /// non-array variables read as empty.
    pub fn get_str_array(&self, name: &str) -> Vec<String> {
        match self.vars.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A fully rendered response body for one view.
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub mode: RenderMode,
    pub html: String,
    /// Set in [`RenderMode::SingleWidget`]: the widget the fragment replaces.
    pub updated_widget: Option<WidgetId>,
}

/// Template collaborator: view-specific variable hooks plus the actual
/// renderer.
pub trait DashboardTemplates: Send + Sync {
    /// Add dashboard-mode variables before the full dashboard render.
    fn prepare_dashboard(&self, vars: &mut TemplateVars);

    /// Add edit-mode variables before the full edit render.
    fn prepare_edit(&self, vars: &mut TemplateVars);

    /// Add variables for a single-widget partial update. `signal_driven` is
    /// true when the widget handled a signal, false when it was just inserted.
    fn prepare_single_widget(
        &self,
        vars: &mut TemplateVars,
        widget_id: &WidgetId,
        signal_driven: bool,
    );

    /// Render the template for `mode`, pulling widget fragments from `tree`.
    fn render(
        &self,
        mode: RenderMode,
        vars: &TemplateVars,
        tree: &ComponentTree,
    ) -> Result<String, TemplateError>;
}

/// Errors raised while rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template variable missing: {0}")]
    MissingVariable(String),

    #[error("Component not attached: {0}")]
    MissingComponent(String),

    #[error("Render failed: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut vars = TemplateVars::new();
        vars.set("unique_id", "dash");
        vars.set("user_widget_ids", vec!["a", "b"]);
        assert_eq!(vars.get_str("unique_id"), Some("dash"));
        assert_eq!(vars.get_str_array("user_widget_ids"), vec!["a", "b"]);
    }

    #[test]
    fn missing_array_reads_empty() {
        let vars = TemplateVars::new();
        assert!(vars.get_str_array("nope").is_empty());
    }

    #[test]
    fn iter_walks_variables_in_name_order() {
        let mut vars = TemplateVars::new();
        vars.set("unique_id", "dash");
        vars.set("available_widgets", vec!["note"]);
        let names: Vec<&str> = vars.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["available_widgets", "unique_id"]);
    }
}
