use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use rolegate_core::ErrorKind;

static METRICS_ENABLED: OnceLock<bool> = OnceLock::new();

/// False until [`init_metrics`] has installed a recorder.
pub fn is_metrics_enabled() -> bool {
    METRICS_ENABLED.get().copied().unwrap_or(false)
}

/// Installs the Prometheus recorder and spawns its upkeep task.
/// Returns `None` when metrics are disabled.
pub fn init_metrics(enabled: bool) -> Result<Option<PrometheusHandle>, BuildError> {
    if !enabled {
        let _ = METRICS_ENABLED.set(false);
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    let _ = METRICS_ENABLED.set(true);
    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_metrics_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_guard_rejection(kind: ErrorKind) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("guard_rejections_total", "kind" => kind.as_str()).increment(1);
}

pub fn track_token_issued(kind: &'static str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total", "kind" => kind).increment(1);
}

pub fn track_login_failure() {
    if !is_metrics_enabled() {
        return;
    }
    counter!("user_logins_total", "status" => "failure").increment(1);
}
