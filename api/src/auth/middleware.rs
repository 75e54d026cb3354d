use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, header},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::info;

use crate::auth::extractors::extract_bearer_token;
use crate::auth::verify_jwt;

/// Logs method, path, IP address, user ID (if authenticated), origin, and
/// user-agent for each incoming HTTP request. CORS preflight `OPTIONS`
/// requests are skipped.
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let user_id = extract_bearer_token(req.headers())
        .and_then(|token| verify_jwt(&token).ok())
        .map(|claims| claims.sub);

    {
        let header_str = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_owned()
        };

        info!(
            method = ?req.method(),
            path = %req.uri().path(),
            ip = %addr.ip(),
            user = user_id.unwrap_or(0),
            origin = header_str(header::ORIGIN),
            user_agent = header_str(header::USER_AGENT),
            "Incoming request"
        );
    }

    next.run(req).await
}
