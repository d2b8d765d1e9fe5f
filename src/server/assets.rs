// src/server/assets.rs

//! Embedded web UI with single-page-app fallback.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use include_dir::{Dir, include_dir};

/// The browser UI shipped inside the binary.
pub static WEB_ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web");

/// Entry page, also served for every unknown path.
pub const INDEX: &str = "index.html";

pub async fn serve_asset(uri: Uri) -> Response {
    asset_response(&WEB_ASSETS, uri.path())
}

/// Resolve `path` against `assets`.
///
/// - `/` maps to [`INDEX`].
/// - Known files are served with a content type from [`content_type_for`].
/// - Anything else gets [`INDEX`] as `text/html`.
/// - Paths starting with `/raw` or `/events` (other than the routes
///   themselves) are 404.
pub fn asset_response(assets: &'static Dir<'static>, path: &str) -> Response {
    if is_api_path(path) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let name = match path.trim_start_matches('/') {
        "" => INDEX,
        name => name,
    };

    if let Some(file) = assets.get_file(name) {
        return file_response(file.contents(), content_type_for(name));
    }

    match assets.get_file(INDEX) {
        Some(index) => file_response(index.contents(), Some("text/html")),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Content type for the handful of extensions the UI uses.
pub fn content_type_for(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "js" => Some("application/javascript"),
        "css" => Some("text/css"),
        "html" => Some("text/html"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Anything sharing a prefix with an API route is never an asset, so
/// `/rawfile` and `/events/x` are 404 rather than the entry page.
fn is_api_path(path: &str) -> bool {
    ["/raw", "/events"]
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

fn file_response(contents: &'static [u8], content_type: Option<&'static str>) -> Response {
    let mut response = Response::new(Body::from(contents));
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}
