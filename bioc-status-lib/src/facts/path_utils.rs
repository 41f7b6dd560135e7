//! Helpers for turning remote identifiers into cache file names.

use url::Url;

/// Sanitize a string for use as a single path component.
///
/// Replaces `..` and characters that are unsafe in file names, so remote input such as
/// package names or URL paths cannot escape the cache directory.
#[must_use]
pub fn sanitize_path_component(s: &str) -> String {
    let s = s.replace("..", "__");
    s.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|', '&', '='], "_")
}

/// Build the cache file name used for a fetched page.
///
/// The host, with its port when one is given, becomes a directory and the rest of the
/// URL a single file name.
#[must_use]
pub fn page_cache_filename(url: &Url) -> String {
    let host = url.host_str().unwrap_or("local");
    let host = match url.port() {
        Some(port) => sanitize_path_component(&format!("{host}:{port}")),
        None => sanitize_path_component(host),
    };
    let mut rest = url.path().trim_matches('/').to_string();
    if let Some(query) = url.query() {
        rest.push('?');
        rest.push_str(query);
    }

    if rest.is_empty() {
        rest.push_str("index");
    }

    format!("pages/{host}/{}.json", sanitize_path_component(&rest))
}
