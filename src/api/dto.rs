//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Insert-widget signal request
#[derive(Debug, Deserialize)]
pub struct InsertWidgetRequest {
    /// Widget type to insert
    pub widget_type_id: String,
    /// Insert before this widget; empty or missing means default position
    #[serde(default)]
    pub before_widget_id: Option<String>,
}

/// Move-widget signal request
#[derive(Debug, Deserialize)]
pub struct MoveWidgetRequest {
    /// Move before this widget; empty or missing means "to the end"
    #[serde(default)]
    pub related_widget_id: Option<String>,
}

/// Signal addressed to a single widget
#[derive(Debug, Deserialize)]
pub struct WidgetSignalRequest {
    /// Signal name, interpreted by the widget component
    pub signal: String,
    /// Signal arguments
    #[serde(default)]
    pub args: HashMap<String, String>,
}

/// Health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub sessions: usize,
}
