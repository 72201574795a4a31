//! Widgetboard Server
//!
//! Demo host for the dashboard control: an in-memory widget manager with the
//! builtin widget types, plain HTML templates, and the Axum API on top.
//!
//! # Configuration
//!
//! TOML config from the usual locations (see [`widgetboard::Config`]) plus
//! environment overrides:
//! - `WIDGETBOARD_HOST`: host to bind to (default: 0.0.0.0)
//! - `WIDGETBOARD_PORT`: port to listen on (default: 8090)
//! - `WIDGETBOARD_CONTROL_ID`: control id exposed to templates
//! - `WIDGETBOARD_LOG_LEVEL`: log level when `RUST_LOG` is unset (default: info)
//! - `WIDGETBOARD_LOG_FORMAT`: `pretty` or `json` log output (default: pretty)
//! - `RUST_LOG`: log filter, takes precedence over the configured level

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use widgetboard::api::{serve, ApiConfig, AppState};
use widgetboard::templates::HtmlTemplates;
use widgetboard::widgets::{
    ClockWidget, InMemoryWidgetManager, NoteWidget, WidgetHandle, WidgetId, WidgetTypeId,
};
use widgetboard::Config;
use widgetboard::WidgetManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first: the logging section decides how tracing is set up.
    let config = Config::load_default();
    init_logging(&config.logging);

    tracing::info!("Starting Widgetboard server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Logging: level {} format {}",
        config.logging.level,
        config.logging.format
    );

    let manager = Arc::new(InMemoryWidgetManager::new());
    register_builtin_widgets(&manager).await;
    seed_demo_dashboard(&manager).await?;

    let api_config = ApiConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        control_id: config.dashboard.control_id.clone(),
        session_param: config.dashboard.session_param.clone(),
    };

    let state = AppState::new(manager, Arc::new(HtmlTemplates::new()), api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Widgetboard server stopped");
    Ok(())
}

/// Initialize tracing: `RUST_LOG` wins when set, otherwise the filter comes
/// from the logging section of the config, as does the output format.
fn init_logging(logging: &widgetboard::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.filter_directives()));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Register the builtin widget types in the catalog.
async fn register_builtin_widgets(manager: &InMemoryWidgetManager) {
    manager
        .register_widget_type(
            WidgetTypeId::new("note"),
            Arc::new(|_id: &WidgetId| Arc::new(NoteWidget::new("A fresh note")) as WidgetHandle),
        )
        .await;
    manager
        .register_widget_type(
            WidgetTypeId::new("clock"),
            Arc::new(|_id: &WidgetId| Arc::new(ClockWidget) as WidgetHandle),
        )
        .await;
    tracing::info!("Registered builtin widget types: note, clock");
}

/// Put a couple of widgets on the demo dashboard so the first render is not
/// empty.
async fn seed_demo_dashboard(
    manager: &InMemoryWidgetManager,
) -> Result<(), widgetboard::WidgetError> {
    manager
        .insert_widget(&WidgetTypeId::new("note"), None)
        .await?;
    manager
        .insert_widget(&WidgetTypeId::new("clock"), None)
        .await?;
    Ok(())
}
