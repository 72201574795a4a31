//! Builtin Widgets
//!
//! Small widget components used by the demo server and the test suite. Real
//! hosts register their own [`WidgetComponent`] types.

use super::{WidgetComponent, WidgetError, WidgetTypeId};
use chrono::Local;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// A free-text note. Its `set-note` signal replaces the text, which is what
/// the saved-state flow persists.
pub struct NoteWidget {
    text: Mutex<String>,
}

impl NoteWidget {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
        }
    }

    pub fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }
}

impl WidgetComponent for NoteWidget {
    fn widget_type(&self) -> WidgetTypeId {
        WidgetTypeId::new("note")
    }

    fn render(&self) -> String {
        format!(
            "<div class=\"widget-note\">{}</div>",
            crate::templates::escape(&self.text())
        )
    }

    fn handle_signal(
        &self,
        signal: &str,
        args: &HashMap<String, String>,
    ) -> Result<(), WidgetError> {
        match signal {
            "set-note" => {
                let text = args
                    .get("text")
                    .ok_or_else(|| WidgetError::MissingArgument("text".to_string()))?;
                *self.text.lock().unwrap() = text.clone();
                Ok(())
            }
            other => Err(WidgetError::UnknownSignal(other.to_string())),
        }
    }

    fn state(&self) -> serde_json::Value {
        json!({ "text": self.text() })
    }
}

/// Shows the current local time. Stateless; signals are not supported.
pub struct ClockWidget;

impl WidgetComponent for ClockWidget {
    fn widget_type(&self) -> WidgetTypeId {
        WidgetTypeId::new("clock")
    }

    fn render(&self) -> String {
        format!(
            "<div class=\"widget-clock\">{}</div>",
            Local::now().format("%H:%M:%S")
        )
    }

    fn handle_signal(
        &self,
        signal: &str,
        _args: &HashMap<String, String>,
    ) -> Result<(), WidgetError> {
        Err(WidgetError::UnknownSignal(signal.to_string()))
    }
}
