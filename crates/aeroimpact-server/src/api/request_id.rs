//! Request correlation: one id per inbound call, echoed back and attached to
//! the `http` span so upstream fetch logs can be tied to the refresh or
//! selection that caused them.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{field, Instrument, Span};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id for one inbound request, available as an extension.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

fn incoming_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Tag the current `http` span with the refresh sequence number it took.
pub fn record_refresh_seq(seq: u64) {
    Span::current().record("refresh_seq", seq);
}

/// Tag the current `http` span with the flight a selection resolved to.
pub fn record_selected(icao24: &str) {
    Span::current().record("icao24", icao24);
}

/// Reuse the caller's `x-request-id` or mint one, and echo it on the response.
///
/// The span leaves `refresh_seq` and `icao24` empty; the flight handlers fill
/// them in once they know the values.
pub async fn ensure_request_id(mut request: Request, next: Next) -> Response {
    let request_id = incoming_id(&request).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let span = tracing::info_span!(
        "http",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        refresh_seq = field::Empty,
        icao24 = field::Empty,
    );
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
