use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, Request},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::fingerprint::Fingerprint;
use super::gate::{Admission, AdmissionGate, MALFORMED_CALLER_WAIT_SECS};

/// Admission layer for sensitive routes.
///
/// Derives the caller fingerprint from the peer address and `User-Agent`
/// header, asks the gate, and either forwards the request or answers 429
/// with a `Retry-After` header. A user-agent that cannot be read as text
/// fails closed with a short fixed wait.
pub async fn admission_middleware(
    Extension(gate): Extension<Arc<AdmissionGate>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let user_agent = match request.headers().get(header::USER_AGENT) {
        Some(value) => match value.to_str() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Undecodable user-agent from {}, failing closed", addr);
                return deny_response(MALFORMED_CALLER_WAIT_SECS);
            }
        },
        None => "",
    };

    let fingerprint = Fingerprint::derive(&addr.ip().to_string(), user_agent);
    match gate.admit(&fingerprint) {
        Admission::Allow => next.run(request).await,
        Admission::Deny { retry_after_secs } => deny_response(retry_after_secs),
    }
}

fn deny_response(retry_after_secs: u64) -> Response {
    let message = format!(
        "Please wait {} before calling this route again.",
        format_wait(retry_after_secs)
    );
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after_secs.to_string())],
        Json(json!({ "message": message })),
    )
        .into_response()
}

/// Renders a wait in seconds as `"1h 2m 3s"`.
fn format_wait(total_secs: u64) -> String {
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::format_wait;

    #[test]
    fn test_format_wait() {
        assert_eq!(format_wait(0), "0h 0m 0s");
        assert_eq!(format_wait(59), "0h 0m 59s");
        assert_eq!(format_wait(61), "0h 1m 1s");
        assert_eq!(format_wait(3_661), "1h 1m 1s");
        assert_eq!(format_wait(7_200), "2h 0m 0s");
    }
}
