//! Request interception: access log, panic recovery, timeout and statistics recording.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::handlers::AppState;
use crate::signature::encode_request;

/// Log method, uri, status and elapsed time of every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} in {:?}",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Turn a panicking handler into a `500 Internal Server Error`.
pub async fn recover_panics(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::spawn(next.run(request)).await {
        Ok(response) => response,
        Err(e) if e.is_panic() => {
            log::error!("handler panicked on {} {}", method, uri);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            log::error!("handler task failed on {} {}: {}", method, uri, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Abort a request that takes longer than the configured timeout.
pub async fn timeout(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limit = state.config.request_timeout();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            log::warn!("request timed out after {:?}", limit);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Count the request signature, then hand the untouched request on.
///
/// Failing to record a statistic never fails the request itself.
pub async fn with_stats(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let request = match encode_request(request, state.config.max_body_bytes).await {
        Ok((signature, request)) => {
            if let Err(e) = state.stats.add(&signature.api, &signature.params) {
                log::warn!("failed to record stats for {}: {}", signature.api, e);
            }
            request
        }
        Err(e) => {
            log::warn!("failed to read request body: {}", e);
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }
    };

    next.run(request).await
}
