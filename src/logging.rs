use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, Level, debug, error, info, info_span, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use rolegate_config::ServerConfig;

/// Level and message for a finished request, chosen by status class.
fn outcome(status: StatusCode) -> (Level, &'static str) {
    if status.is_server_error() {
        (Level::ERROR, "Server error")
    } else if status.is_client_error() {
        (Level::WARN, "Client error")
    } else {
        (Level::INFO, "Request completed")
    }
}

/// Wraps each request in an `http_request` span keyed by a fresh request id
/// and the matched route, then logs the outcome inside it.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let span = info_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
        path = %path,
    );

    async move {
        debug!("Incoming request");

        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;

        let (level, message) = outcome(response.status());
        if level == Level::ERROR {
            error!(status, latency_ms, "{}", message);
        } else if level == Level::WARN {
            warn!(status, latency_ms, "{}", message);
        } else {
            info!(status, latency_ms, "{}", message);
        }

        response
    }
    .instrument(span)
    .await
}

/// Console output filtered by `RUST_LOG`, plus daily JSON files when a log
/// directory is configured. Keep the returned guard alive for the life of the
/// process or buffered file output is lost.
pub fn init_tracing(config: &ServerConfig) -> anyhow::Result<Option<WorkerGuard>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // axum logs extractor rejections under `axum::rejection` at TRACE
        EnvFilter::new(format!(
            "{}=debug,tower_http=debug,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let Some(log_dir) = config.log_dir.as_deref() else {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)?;

    let json_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "rolegate.json");
    let (writer, guard) = tracing_appender::non_blocking(json_appender);

    let json_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()?;

    info!(log_dir, "JSON file logging enabled");

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_follows_status_class() {
        assert_eq!(outcome(StatusCode::NO_CONTENT).0, Level::INFO);
        assert_eq!(outcome(StatusCode::FOUND).0, Level::INFO);
        assert_eq!(outcome(StatusCode::FORBIDDEN), (Level::WARN, "Client error"));
        assert_eq!(
            outcome(StatusCode::INTERNAL_SERVER_ERROR),
            (Level::ERROR, "Server error")
        );
    }
}
