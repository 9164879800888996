//! Validation and canonicalization of user-typed bookmark URLs.
//!
//! [`normalize`] is pure: it never touches the network and always maps the
//! same input to the same output. A scheme-less entry such as `example.com`
//! is treated as `https://example.com`; the host is lower-cased while the
//! path, query and fragment are carried over as parsed.

use crate::domain::BookmarkError;
use std::fmt;
use url::Url;

/// A URL that passed [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates raw URL text and rebuilds it in canonical form.
///
/// - Trims whitespace; empty input is rejected.
/// - Prepends `https://` unless the text already starts with `http://` or
///   `https://` (any case).
/// - Rejects text that does not parse or has no host.
/// - Rebuilds `scheme://host[:port][path][?query][#fragment]` with the host
///   lower-cased. User-info is dropped and a default port is omitted. A URL
///   typed without a path does not gain a trailing `/`.
///
/// Returns [`BookmarkError::InvalidUrl`] holding the trimmed input on failure.
pub fn normalize(raw: &str) -> Result<NormalizedUrl, BookmarkError> {
    let trimmed = raw.trim();
    let invalid = || BookmarkError::InvalidUrl(trimmed.to_owned());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let with_scheme = if has_http_scheme(trimmed) {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|_| invalid())?;

    let host = match parsed.host_str() {
        Some(host) if !host.trim().is_empty() => host.to_lowercase(),
        _ => return Err(invalid()),
    };

    let scheme = match parsed.scheme() {
        "" => "https",
        scheme => scheme,
    };

    let mut out = format!("{scheme}://{host}");
    if let Some(port) = parsed.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    if has_explicit_path(&with_scheme) {
        out.push_str(parsed.path());
    }
    if let Some(query) = parsed.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = parsed.fragment() {
        out.push('#');
        out.push_str(fragment);
    }

    Ok(NormalizedUrl(out))
}

fn has_http_scheme(text: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        text.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Whether the authority in `with_scheme` is followed by a path segment.
///
/// The URL parser always reports at least `/` for http(s), so the typed text
/// is inspected to keep `example.com` from turning into `example.com/`.
fn has_explicit_path(with_scheme: &str) -> bool {
    let Some(start) = with_scheme.find("://") else {
        return false;
    };
    let rest = &with_scheme[start + 3..];

    matches!(
        rest.chars().find(|c| matches!(c, '/' | '\\' | '?' | '#')),
        Some('/' | '\\')
    )
}
