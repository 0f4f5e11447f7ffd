//! Middleware for the Espresso Emporium HTTP server

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware.
///
/// Every request runs inside a span carrying a request id, which is echoed
/// back in the `x-request-id` response header. An id set by an upstream proxy
/// is reused; otherwise a UUID v4 is generated.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);
    let start_time = Instant::now();

    let span = info_span!("request", id = %request_id, method = %method, uri = %uri);

    async move {
        debug!("Incoming request");

        let mut response = next.run(request).await;

        let duration = start_time.elapsed();
        let status = response.status();

        if status.is_server_error() || status.is_client_error() {
            warn!("{} {} - {} ({:?})", method, uri, status, duration);
        } else {
            info!("{} {} - {} ({:?})", method, uri, status, duration);
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}
