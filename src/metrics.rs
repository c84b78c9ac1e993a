// src/metrics.rs
//! Prometheus recorder for the binary. The library only emits through the
//! `metrics` facade, so tests run without a recorder installed.

use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::categories::{CategoryRegistry, RenderVariant};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global recorder and publish the catalog shape.
    /// Fails if a recorder is already installed in this process.
    pub fn init(registry: &CategoryRegistry) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_gauge!("scout_categories", "Configured categories per render variant.");
        for variant in [RenderVariant::Default, RenderVariant::LinkList, RenderVariant::Profile] {
            let n = registry.list().iter().filter(|c| c.variant == variant).count();
            gauge!("scout_categories", "variant" => variant.as_str()).set(n as f64);
        }

        Ok(Self { handle })
    }

    /// `/metrics` in the Prometheus text exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
    }
}
