//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use super::session::SessionStore;
use crate::control::{DashboardControl, DashboardTemplates};
use crate::widgets::WidgetManager;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Widget manager backing the dashboard control
    pub manager: Arc<dyn WidgetManager>,
    /// Template collaborator used for rendering
    pub templates: Arc<dyn DashboardTemplates>,
    /// Per-session persisted view state
    pub sessions: Arc<SessionStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        manager: Arc<dyn WidgetManager>,
        templates: Arc<dyn DashboardTemplates>,
        config: ApiConfig,
    ) -> Self {
        Self {
            manager,
            templates,
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Build a request-scoped control carrying the view persisted for the
    /// session.
    pub async fn control_for(&self, session_id: &str) -> DashboardControl {
        let view = self.sessions.view(session_id).await;
        DashboardControl::new(
            Arc::clone(&self.manager),
            Arc::clone(&self.templates),
            self.config.control_id.clone(),
        )
        .with_view(view)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Unique id of the dashboard control, exposed to templates
    pub control_id: String,
    /// Query parameter carrying the session id
    pub session_param: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            control_id: "dashboard".to_string(),
            session_param: "session".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
