use axum::{extract::Request, middleware::Next, response::Response};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::time::OffsetTime, prelude::*};

use crate::origin::RequestOrigin;

#[tracing::instrument(name = "Request", level = "debug", skip_all, fields(origin = %origin, uri = %req.uri(), method = %req.method()))]
pub async fn log_request(origin: RequestOrigin, req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    tracing::debug!(status = %res.status(), "response");
    res
}

/// Must be called before the tokio runtime is started, as the local time offset
/// cannot be read safely from a multi-threaded context.
pub fn setup_logger(debug_mode: bool, log_to_file: bool) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();
    let time_format =
        time::format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .expect("format string should be valid!");
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(offset, time_format);

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(guard);
    let stdout_writer = fmt::Layer::new()
        .with_timer(timer.clone())
        .with_writer(non_blocking);

    let file_writer = if log_to_file {
        let (non_blocking, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily("./", "httputil.log"));
        guards.push(guard);
        let file_writer = fmt::Layer::new()
            .with_ansi(false)
            .with_timer(timer)
            .with_writer(non_blocking);
        Some(file_writer)
    } else {
        None
    };

    let registry = tracing_subscriber::registry()
        .with(stdout_writer)
        .with(file_writer);

    if debug_mode {
        registry
            .with(tracing_subscriber::EnvFilter::new("httputil=debug"))
            .init();
    } else {
        registry
            .with(tracing_subscriber::EnvFilter::new("httputil=info"))
            .init();
    }

    guards
}
