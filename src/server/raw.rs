// src/server/raw.rs

//! `GET /raw`: the tracked file's bytes, read fresh on every request.

use std::sync::Arc;
use std::time::SystemTime;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ETAG, IF_NONE_MATCH, LAST_MODIFIED,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::server::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

pub async fn serve_raw(State(state): State<AppState>, request_headers: HeaderMap) -> Response {
    let fs = Arc::clone(&state.fs);
    let path = Arc::clone(&state.file);

    let snapshot = match tokio::task::spawn_blocking(move || fs.snapshot(&path)).await {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(err)) => {
            debug!(error = %err, "tracked file unavailable");
            return (StatusCode::NOT_FOUND, format!("{err:#}")).into_response();
        }
        Err(err) => {
            warn!(error = %err, "reading tracked file panicked");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to read file").into_response();
        }
    };

    let etag = weak_etag(&snapshot.contents);
    let mut response = Response::new(Body::empty());
    set_header(&mut response, ETAG, &etag);
    if let Some(modified) = snapshot.modified {
        set_header(&mut response, LAST_MODIFIED, &http_date(modified));
    }

    if validator_matches(&request_headers, &etag) {
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        return response;
    }

    if state.cors {
        set_header(&mut response, ACCESS_CONTROL_ALLOW_ORIGIN, "*");
    }
    set_header(&mut response, CONTENT_TYPE, TEXT_PLAIN);
    *response.body_mut() = Body::from(snapshot.contents);
    response
}

/// Short weak validator derived from the content hash: `W/"<16 hex>"`.
pub fn weak_etag(contents: &[u8]) -> String {
    let hash = blake3::hash(contents);
    format!("W/\"{}\"", &hash.to_hex().as_str()[..16])
}

/// IMF-fixdate as used by `Last-Modified`, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Any `If-None-Match` value containing our validator counts as a match.
fn validator_matches(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(etag))
}

fn set_header(response: &mut Response, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response.headers_mut().insert(name, value);
        }
        Err(err) => warn!(header = %name, error = %err, "invalid header value; skipped"),
    }
}
