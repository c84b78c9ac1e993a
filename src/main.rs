//! Market Scout binary entrypoint.
//! Boots the Axum HTTP server, wiring config, the dashboard session, and metrics.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_scout::metrics::Metrics;
use market_scout::{build_dashboard, create_router, AppState, ScoutConfig};

/// Compact logs by default; `SCOUT_LOG_FORMAT=json` for structured output.
/// Filter comes from `RUST_LOG`, defaulting to `market_scout=info,warn`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("market_scout=info,warn"));

    let json = std::env::var("SCOUT_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // The Shuttle runtime may already own the global subscriber; keep theirs then.
    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ScoutConfig::load_default()?;
    let dashboard = build_dashboard(&cfg)?;
    let metrics = Metrics::init(dashboard.registry())?;

    let router = create_router(AppState::new(dashboard)).merge(metrics.router());

    Ok(router.into())
}
