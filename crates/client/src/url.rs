//! Base URL and path resolution

use std::borrow::Cow;

/// Prepend `/` to a request path that lacks one
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Strip trailing slashes from a configured base URL
///
/// Returns `None` for an absent or empty base, meaning same-origin requests.
pub fn normalize_base(base: Option<&str>) -> Option<String> {
    base.map(|b| b.trim().trim_end_matches('/'))
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}

/// Resolve `path` against an optional base URL
pub fn api_url(base: Option<&str>, path: &str) -> String {
    let path = normalize_path(path);
    match normalize_base(base) {
        Some(base) => format!("{base}{path}"),
        None => path.into_owned(),
    }
}

/// Path portion of a normalized request path, without query or fragment
pub(crate) fn route_of(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
