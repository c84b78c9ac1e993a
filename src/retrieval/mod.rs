// src/retrieval/mod.rs
pub mod normalize;
pub mod providers;
pub mod types;

pub use normalize::{normalize_body, normalize_value};
pub use types::{CompanyProfile, OpportunityProvider, OpportunityRecord, RecordVariant};

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// Everything that can go wrong between "fetch category" and "records".
/// Callers absorb it into an empty result; it never reaches rendering.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid provider url: {0}")]
    InvalidUrl(String),
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}")]
    Status { status: u16 },
    #[error("malformed provider body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected provider body: expected array or object, got {0}")]
    Shape(&'static str),
}

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scout_fetch_total", "Provider fetches started.");
        describe_counter!(
            "scout_fetch_errors_total",
            "Provider fetches that failed (transport, status or decode)."
        );
        describe_counter!(
            "scout_fetch_stale_total",
            "Fetch results discarded because a newer fetch superseded them."
        );
        describe_counter!(
            "scout_fetch_records_total",
            "Records returned by successful provider fetches."
        );
        describe_histogram!("scout_fetch_ms", "Provider round-trip time in milliseconds.");
        describe_gauge!(
            "scout_visible_records",
            "Records visible after the active time window was applied."
        );
    });
}
