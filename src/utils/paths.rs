//! URL path helpers shared by the loop controller and the summary page.
//!
//! Routes and base URLs arrive with or without leading/trailing slashes; these
//! helpers normalise them so redirects and links come out the same either way.

use once_cell::sync::Lazy;
use regex::Regex;

static REPEATED_SLASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new("/{2,}").expect("valid repeated slash pattern"));

/// Joins URL segments with `/`, collapsing any doubled separators.
pub fn join_url<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    REPEATED_SLASHES.replace_all(&joined, "/").into_owned()
}

pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

pub fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Route without its leading or trailing slash, e.g. `/badgers/` -> `badgers`.
pub fn relative_route(route: &str) -> &str {
    strip_trailing_slash(strip_leading_slash(route))
}

/// Key used for a step path in section and store lookups: every slash removed.
pub fn section_key(path: &str) -> String {
    path.replace('/', "")
}
