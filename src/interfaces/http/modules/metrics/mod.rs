//! Prometheus recorder, scrape endpoint and HTTP metrics middleware

pub mod handlers;
pub mod middleware;

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::support::InfraError;

pub use handlers::*;
pub use middleware::http_metrics_middleware;

static PROM_HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Install the global Prometheus recorder once per process and return its handle.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, InfraError> {
    PROM_HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(InfraError::Metrics)
}
