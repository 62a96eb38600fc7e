//! Repository index handler
//!
//! Forwards the request path to the Contents API and turns the answer into
//! either a listing page or a redirect to the raw file.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::github::{Contents, Entry, GithubClient, UpstreamError};
use crate::handler::router::RequestContext;
use crate::http;
use crate::listing;
use crate::logger;

/// Serve one repository path; performs exactly one upstream request
pub async fn serve_path(ctx: &RequestContext<'_>, github: &GithubClient) -> Response<Full<Bytes>> {
    let repo_path = match http::extract_repo_path(ctx.path) {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!("Rejected request path '{}': {e}", ctx.path));
            return http::build_400_response();
        }
    };

    let result = github
        .fetch_contents(&repo_path)
        .await
        .and_then(|contents| respond(&repo_path, contents, ctx.is_head));

    match result {
        Ok(response) => response,
        Err(err) => {
            log_upstream_error(&repo_path, &err);
            http::build_error_response(err.status_code())
        }
    }
}

fn respond(
    repo_path: &str,
    contents: Contents,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, UpstreamError> {
    match contents {
        Contents::Directory(entries) => {
            let html = listing::render_index(repo_path, &entries);
            Ok(http::build_html_response(html, is_head))
        }
        Contents::File(Entry {
            path, download_url, ..
        }) => match download_url {
            Some(url) => Ok(http::build_redirect_response(&url)),
            None => Err(UpstreamError::MissingDownloadUrl { path }),
        },
    }
}

fn log_upstream_error(repo_path: &str, err: &UpstreamError) {
    let message = format!("/{repo_path}: {err}");
    match err {
        UpstreamError::Status { .. } => logger::log_warning(&message),
        _ => logger::log_error(&message),
    }
}
