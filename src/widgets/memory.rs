//! In-Memory Widget Manager
//!
//! Reference [`WidgetManager`] backed by process memory. Keeps the user's
//! ordered widget list, the live component instances, saved configuration
//! snapshots, and a registry of insertable widget types.
//!
//! Intended for the demo server and for tests; a production host would back
//! the same trait with real persistence.

use super::{WidgetError, WidgetHandle, WidgetId, WidgetManager, WidgetResult, WidgetTypeId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Factory producing a fresh component instance for a widget type.
pub type WidgetFactory = Arc<dyn Fn(&WidgetId) -> WidgetHandle + Send + Sync>;

struct ManagerState {
    /// User's widgets, in dashboard order.
    order: Vec<WidgetId>,
    /// Live component per widget id.
    instances: HashMap<WidgetId, WidgetHandle>,
    /// Last saved configuration snapshot per widget id.
    saved: HashMap<WidgetId, serde_json::Value>,
    /// Insertable widget types, in registration order.
    catalog: Vec<(WidgetTypeId, WidgetFactory)>,
}

/// In-memory [`WidgetManager`] implementation.
pub struct InMemoryWidgetManager {
    state: RwLock<ManagerState>,
}

impl InMemoryWidgetManager {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ManagerState {
                order: Vec::new(),
                instances: HashMap::new(),
                saved: HashMap::new(),
                catalog: Vec::new(),
            }),
        }
    }

    /// Register an insertable widget type. Re-registering a type id replaces
    /// its factory and keeps the original catalog position.
    pub async fn register_widget_type(&self, widget_type: WidgetTypeId, factory: WidgetFactory) {
        let mut state = self.state.write().await;
        if let Some(entry) = state.catalog.iter_mut().find(|(t, _)| *t == widget_type) {
            entry.1 = factory;
        } else {
            state.catalog.push((widget_type, factory));
        }
    }

    /// Last saved configuration snapshot for a widget, if any.
    pub async fn saved_state(&self, id: &WidgetId) -> Option<serde_json::Value> {
        self.state.read().await.saved.get(id).cloned()
    }
}

impl Default for InMemoryWidgetManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WidgetManager for InMemoryWidgetManager {
    async fn user_widget_ids(&self) -> WidgetResult<Vec<WidgetId>> {
        Ok(self.state.read().await.order.clone())
    }

    async fn available_widgets(&self) -> WidgetResult<Vec<(WidgetTypeId, WidgetHandle)>> {
        let state = self.state.read().await;
        let previews = state
            .catalog
            .iter()
            .map(|(widget_type, factory)| {
                let preview_id = WidgetId::new(format!("preview-{}", widget_type));
                (widget_type.clone(), factory(&preview_id))
            })
            .collect();
        Ok(previews)
    }

    async fn single_widget_instance(&self, id: &WidgetId) -> WidgetResult<WidgetHandle> {
        let state = self.state.read().await;
        state
            .instances
            .get(id)
            .cloned()
            .ok_or_else(|| WidgetError::UnknownWidget(id.clone()))
    }

    async fn insert_widget(
        &self,
        widget_type: &WidgetTypeId,
        before_widget_id: Option<&WidgetId>,
    ) -> WidgetResult<WidgetId> {
        let mut state = self.state.write().await;

        let factory = state
            .catalog
            .iter()
            .find(|(t, _)| t == widget_type)
            .map(|(_, f)| Arc::clone(f))
            .ok_or_else(|| WidgetError::UnknownWidgetType(widget_type.clone()))?;

        let id = WidgetId::new(Uuid::new_v4().to_string());
        let instance = factory(&id);

        // Unknown anchors fall back to the default position at the end.
        let position = before_widget_id
            .and_then(|before| state.order.iter().position(|w| w == before))
            .unwrap_or(state.order.len());

        state.order.insert(position, id.clone());
        state.instances.insert(id.clone(), instance);

        tracing::debug!(widget = %id, widget_type = %widget_type, "inserted widget");
        Ok(id)
    }

    async fn remove_widget(&self, id: &WidgetId) -> WidgetResult<()> {
        let mut state = self.state.write().await;
        let position = state
            .order
            .iter()
            .position(|w| w == id)
            .ok_or_else(|| WidgetError::UnknownWidget(id.clone()))?;
        state.order.remove(position);
        state.instances.remove(id);
        state.saved.remove(id);
        tracing::debug!(widget = %id, "removed widget");
        Ok(())
    }

    async fn move_widget_before(
        &self,
        id: &WidgetId,
        related_widget_id: Option<&WidgetId>,
    ) -> WidgetResult<()> {
        let mut state = self.state.write().await;
        let position = state
            .order
            .iter()
            .position(|w| w == id)
            .ok_or_else(|| WidgetError::UnknownWidget(id.clone()))?;
        state.order.remove(position);

        let target = match related_widget_id {
            Some(related) => match state.order.iter().position(|w| w == related) {
                Some(target) => target,
                None => {
                    // Put the widget back so a failed move leaves the order intact.
                    state.order.insert(position, id.clone());
                    return Err(WidgetError::UnknownWidget(related.clone()));
                }
            },
            None => state.order.len(),
        };

        state.order.insert(target, id.clone());
        tracing::debug!(widget = %id, "moved widget");
        Ok(())
    }

    async fn save_widget_state(&self, id: &WidgetId, widget: &WidgetHandle) -> WidgetResult<()> {
        let mut state = self.state.write().await;
        if !state.instances.contains_key(id) {
            return Err(WidgetError::UnknownWidget(id.clone()));
        }
        state.saved.insert(id.clone(), widget.state());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::NoteWidget;

    fn note_factory() -> WidgetFactory {
        Arc::new(|_id: &WidgetId| Arc::new(NoteWidget::new("hello")) as WidgetHandle)
    }

    async fn manager_with_type(widget_type: &str) -> InMemoryWidgetManager {
        let manager = InMemoryWidgetManager::new();
        manager
            .register_widget_type(WidgetTypeId::new(widget_type), note_factory())
            .await;
        manager
    }

    #[tokio::test]
    async fn insert_appends_by_default() {
        let manager = manager_with_type("note").await;
        let a = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let b = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        assert_eq!(manager.user_widget_ids().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn insert_before_positions_widget() {
        let manager = manager_with_type("note").await;
        let a = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let b = manager
            .insert_widget(&WidgetTypeId::new("note"), Some(&a))
            .await
            .unwrap();
        assert_eq!(manager.user_widget_ids().await.unwrap(), vec![b, a]);
    }

    #[tokio::test]
    async fn insert_unknown_type_fails() {
        let manager = manager_with_type("note").await;
        let err = manager
            .insert_widget(&WidgetTypeId::new("missing"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WidgetError::UnknownWidgetType(_)));
    }

    #[tokio::test]
    async fn remove_unknown_widget_fails() {
        let manager = manager_with_type("note").await;
        let err = manager
            .remove_widget(&WidgetId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, WidgetError::UnknownWidget(_)));
    }

    #[tokio::test]
    async fn move_before_reorders() {
        let manager = manager_with_type("note").await;
        let a = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let b = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        manager.move_widget_before(&b, Some(&a)).await.unwrap();
        assert_eq!(
            manager.user_widget_ids().await.unwrap(),
            vec![b.clone(), a.clone()]
        );

        // No related widget means "move to the end".
        manager.move_widget_before(&b, None).await.unwrap();
        assert_eq!(manager.user_widget_ids().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn move_before_unknown_related_fails_and_keeps_order() {
        let manager = manager_with_type("note").await;
        let a = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let b = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let err = manager
            .move_widget_before(&a, Some(&WidgetId::new("missing")))
            .await
            .unwrap_err();
        assert!(matches!(err, WidgetError::UnknownWidget(_)));
        assert_eq!(manager.user_widget_ids().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn save_widget_state_stores_snapshot() {
        let manager = manager_with_type("note").await;
        let id = manager
            .insert_widget(&WidgetTypeId::new("note"), None)
            .await
            .unwrap();
        let instance = manager.single_widget_instance(&id).await.unwrap();
        manager.save_widget_state(&id, &instance).await.unwrap();
        let saved = manager.saved_state(&id).await.unwrap();
        assert_eq!(saved["text"], "hello");
    }
}
