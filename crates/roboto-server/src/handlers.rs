//! HTTP handlers serving the cached documents.

use crate::error::ApiError;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use roboto::{Document, DocumentCache, DocumentKind, Origin};
use std::sync::Arc;
use tracing::warn;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Work out the serving origin from request headers.
///
/// Proxy headers win over `Host`; the scheme defaults to `http`. Returns
/// `None` (and logs) when no usable host is present.
pub fn request_origin(headers: &HeaderMap) -> Option<Origin> {
    let scheme = first_value(headers, FORWARDED_PROTO).unwrap_or("http");
    let host = first_value(headers, FORWARDED_HOST)
        .or_else(|| first_value(headers, header::HOST.as_str()));

    let Some(host) = host else {
        warn!("request has no Host header; rendering without absolute URLs");
        return None;
    };

    match Origin::from_host_header(scheme, host) {
        Ok(origin) => Some(origin),
        Err(e) => {
            warn!("ignoring request origin: {e}");
            None
        }
    }
}

/// First comma-separated value of a header, trimmed.
fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn serve(
    cache: &DocumentCache,
    kind: DocumentKind,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let origin = request_origin(headers);
    let document = cache.get(kind, origin.as_ref())?;
    Ok(document_response(document))
}

fn document_response(document: Document) -> Response {
    (
        [(header::CONTENT_TYPE, document.content_type())],
        document.body().to_string(),
    )
        .into_response()
}

pub async fn robots_txt(
    State(cache): State<Arc<DocumentCache>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve(&cache, DocumentKind::RobotsTxt, &headers)
}

pub async fn sitemap_xml(
    State(cache): State<Arc<DocumentCache>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve(&cache, DocumentKind::SitemapXml, &headers)
}

pub async fn sitemap_txt(
    State(cache): State<Arc<DocumentCache>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve(&cache, DocumentKind::SitemapTxt, &headers)
}
