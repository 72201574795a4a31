//! Component Tree
//!
//! Explicit per-request registry of attached widget components, replacing a
//! framework-owned component tree. Names are namespaced so user widgets and
//! catalog previews can never collide: user widgets attach under
//! `widget-<id>`, catalog entries under `wa<catalog key>`.

use crate::widgets::{WidgetHandle, WidgetId, WidgetTypeId};
use std::collections::BTreeMap;

/// Prefix for user widget components.
pub const WIDGET_COMPONENT_PREFIX: &str = "widget-";

/// Prefix for available-widget (catalog) components.
pub const CATALOG_COMPONENT_PREFIX: &str = "wa";

/// Component name for a user widget.
pub fn widget_component_name(id: &WidgetId) -> String {
    format!("{}{}", WIDGET_COMPONENT_PREFIX, id)
}

/// Component name for a catalog entry.
pub fn catalog_component_name(widget_type: &WidgetTypeId) -> String {
    format!("{}{}", CATALOG_COMPONENT_PREFIX, widget_type)
}

/// Widget components attached during the current request, by component name.
#[derive(Default)]
pub struct ComponentTree {
    components: BTreeMap<String, WidgetHandle>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component under a name. Attaching the same name twice is a
    /// programming error in the control.
    pub fn attach(&mut self, name: String, component: WidgetHandle) -> Result<(), ComponentError> {
        if self.components.contains_key(&name) {
            return Err(ComponentError::DuplicateName(name));
        }
        self.components.insert(name, component);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&WidgetHandle> {
        self.components.get(name)
    }

    /// Component for a user widget id, if attached.
    pub fn widget(&self, id: &WidgetId) -> Option<&WidgetHandle> {
        self.get(&widget_component_name(id))
    }

    /// Component for a catalog entry, if attached.
    pub fn catalog_entry(&self, widget_type: &WidgetTypeId) -> Option<&WidgetHandle> {
        self.get(&catalog_component_name(widget_type))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Errors from component tree manipulation.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("Component already attached: {0}")]
    DuplicateName(String),
}
