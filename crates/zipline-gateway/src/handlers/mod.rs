pub mod api;
pub mod bot;
pub mod pages;
pub mod redirect;

use url::Url;

/// Parses `input` as an absolute http(s) URL.
///
/// Boundary-side validation: nothing reaches the shortening service
/// unless it parses here.
pub(crate) fn parse_absolute_url(input: &str) -> Option<Url> {
    let parsed = Url::parse(input.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str()?;
    Some(parsed)
}
