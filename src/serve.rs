//! Read-only HTTP API over the page registry.
//!
//! Built on `tiny_http`; the presentation layer fetches the page list once and
//! then loads each page on demand.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/pages` | JSON array of page descriptors |
//! | `GET /api/pages/{id}.{ext}` | page content, metadata block stripped |
//! | `GET /api/components/{id}` | component module source |
//! | `GET /api/selection?id={id}` | descriptor of a saved selection, or `null` |
//!
//! An unavailable page or component answers `404`, mirroring the empty
//! result of the registry accessors.

use crate::{
    config::Config,
    log,
    page::{FileName, Format, parse_document},
    registry::Registry,
};
use anyhow::{Context, Result};
use std::{borrow::Cow, io::Cursor, net::SocketAddr, sync::Arc};
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tokio::runtime::Runtime;

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the API server and block until Ctrl+C is received.
///
/// Lazy loads are driven on `runtime`, one request at a time.
pub fn serve_registry(registry: &Registry, config: &Config, runtime: &Runtime) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse()?;
    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}/api/pages", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, registry, runtime) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Routing
// ============================================================================

/// A resolved API request.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Pages,
    Content { id: String, format: Format },
    Component { id: String },
    Selection { id: Option<String> },
    NotFound,
}

/// Map a request URL to a route.
///
/// The query string is split off before the path is percent-decoded, so an
/// encoded `?` stays part of the id. Only `/api/selection` reads the query.
fn resolve(url: &str) -> Route {
    let (raw_path, query) = url.split_once('?').unwrap_or((url, ""));
    let url_path = decode(raw_path).unwrap_or_default();
    let path = url_path.trim_matches('/');

    if path == "api/selection" {
        return Route::Selection {
            id: query_param(query, "id"),
        };
    }

    if path == "api/pages" {
        return Route::Pages;
    }

    if let Some(file) = path.strip_prefix("api/pages/") {
        let FileName { base, extension } = FileName::parse(file);
        return match Format::parse(extension) {
            Some(format) if !base.is_empty() && !file.contains('/') => Route::Content {
                id: base.to_owned(),
                format,
            },
            _ => Route::NotFound,
        };
    }

    match path.strip_prefix("api/components/") {
        Some(id) if !id.is_empty() && !id.contains('/') => Route::Component { id: id.to_owned() },
        _ => Route::NotFound,
    }
}

/// Decoded value of `key` in a query string. Empty values count as absent.
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, value)| decode(value))
        .filter(|value| !value.is_empty())
}

fn decode(s: &str) -> Option<String> {
    urlencoding::decode(s).ok().map(Cow::into_owned)
}

/// JSON for a restored selection: the page, or `null` when it is gone.
fn selection_json(registry: &Registry, id: Option<&str>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&registry.select(id))?)
}

/// Handle a single HTTP request.
fn handle_request(request: Request, registry: &Registry, runtime: &Runtime) -> Result<()> {
    match resolve(request.url()) {
        Route::Pages => {
            let json = serde_json::to_string_pretty(registry.pages())?;
            serve_text(request, json, "application/json; charset=utf-8")
        }
        Route::Content { id, format } => {
            let raw = runtime.block_on(registry.get_content(&id, format));
            if raw.is_empty() {
                return serve_not_found(request);
            }
            let body = parse_document(&raw, format).body;
            serve_text(request, body, content_type(format))
        }
        Route::Component { id } => match runtime.block_on(registry.get_component(&id)) {
            Some(component) => serve_text(
                request,
                component.source.to_string(),
                "text/tsx; charset=utf-8",
            ),
            None => serve_not_found(request),
        },
        Route::Selection { id } => {
            let json = selection_json(registry, id.as_deref())?;
            serve_text(request, json, "application/json; charset=utf-8")
        }
        Route::NotFound => serve_not_found(request),
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Serve text content with the given content type.
fn serve_text(request: Request, content: String, content_type: &str) -> Result<()> {
    let header = Header::from_bytes("Content-Type", content_type)
        .map_err(|_| anyhow::anyhow!("invalid content type `{content_type}`"))?;
    request.respond(Response::from_string(content).with_header(header))?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let headers = Header::from_bytes("Content-Type", "text/plain")
        .map(|h| vec![h])
        .unwrap_or_default();
    let response = Response::new(
        StatusCode(404),
        headers,
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// MIME type for a page's stripped content.
fn content_type(format: Format) -> &'static str {
    match format {
        Format::Markdown => "text/markdown; charset=utf-8",
        Format::VectorImage => "image/svg+xml",
        Format::Component => "text/tsx; charset=utf-8",
        Format::Diagram | Format::PlainText => "text/plain; charset=utf-8",
    }
}
