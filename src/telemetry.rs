use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["scope"]
    )
    .unwrap();
    pub static ref HTTP_REQUESTS_CNTR: CounterVec = register_counter_vec!(
        "http_requests_total",
        "Number of handled requests by route template and status",
        &["method", "route", "status"]
    )
    .unwrap();
}

/// Route label for requests no route matched, so unknown paths don't blow up
/// label cardinality.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Counts every response under its route template (`/questions/{id}`), not the
/// concrete path.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());

    let response = next.run(request).await;
    HTTP_REQUESTS_CNTR
        .with_label_values(&[method.as_str(), route.as_str(), response.status().as_str()])
        .inc();
    response
}

/// Prometheus text exposition of the default registry, with its content type.
pub fn encode_metrics() -> prometheus::Result<(Vec<u8>, String)> {
    let encoder = TextEncoder::new();
    let mut buf = vec![];
    encoder.encode(&prometheus::gather(), &mut buf)?;
    Ok((buf, encoder.format_type().to_owned()))
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info,sqlx=warn"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
