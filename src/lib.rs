// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod fetch_log;
pub mod filter;
pub mod html;
pub mod metrics;
pub mod retrieval;
pub mod session;
pub mod view;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::categories::{Category, CategoryRegistry, RenderVariant};
pub use crate::config::ScoutConfig;
pub use crate::dashboard::{Dashboard, DashboardError};
pub use crate::filter::WindowSelector;
pub use crate::retrieval::{OpportunityProvider, OpportunityRecord, RetrievalError};
pub use crate::view::{render, ViewBody, ViewModel};

use std::sync::Arc;
use tracing::info;

/// Build the dashboard (registry + provider) described by `cfg`.
pub fn build_dashboard(cfg: &ScoutConfig) -> anyhow::Result<Dashboard> {
    let registry = cfg.registry()?;
    let provider = cfg.build_provider(&registry)?;
    info!(
        categories = registry.list().len(),
        provider = provider.name(),
        default = %registry.default_category().name,
        "dashboard ready"
    );
    Ok(Dashboard::new(Arc::new(registry), provider))
}

/// Full application router without the `/metrics` endpoint.
pub fn app(cfg: &ScoutConfig) -> anyhow::Result<axum::Router> {
    let dashboard = build_dashboard(cfg)?;
    Ok(create_router(AppState::new(dashboard)))
}
