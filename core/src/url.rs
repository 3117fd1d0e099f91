//! Decomposition of absolute `http://` URLs.

use crate::error::ClientError;

pub const DEFAULT_PORT: u16 = 80;

const SCHEME: &str = "http://";

/// Borrowed host, port and path of a parsed URL. The path has no leading
/// slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

/// Split `url` into host, port and path without copying.
///
/// The host ends at the first `:` or `/`. A `:` introduces a decimal port; its
/// leading digits are the port and anything else before the next `/` is
/// skipped. Everything after that `/` is the path.
pub fn split_url(url: &str) -> Result<UrlParts<'_>, ClientError> {
    let has_scheme = url
        .get(..SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SCHEME));
    if !has_scheme {
        return Err(ClientError::InvalidScheme);
    }
    let rest = &url[SCHEME.len()..];

    let (host, port, path) = match rest.find([':', '/']) {
        None => (rest, DEFAULT_PORT, ""),
        Some(i) if rest.as_bytes()[i] == b'/' => (&rest[..i], DEFAULT_PORT, &rest[i + 1..]),
        Some(i) => {
            let after = &rest[i + 1..];
            let (port, path) = match after.find('/') {
                Some(j) => (&after[..j], &after[j + 1..]),
                None => (after, ""),
            };
            (&rest[..i], parse_port(port)?, path)
        }
    };

    if host.is_empty() {
        return Err(ClientError::MissingHost);
    }

    Ok(UrlParts { host, port, path })
}

/// Read the port from the leading digits of `field`, after optional blanks and
/// a `+` sign. Trailing bytes are ignored.
fn parse_port(field: &str) -> Result<u16, ClientError> {
    let field = field.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let field = field.strip_prefix('+').unwrap_or(field);
    let end = field
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(field.len());
    match field[..end].parse::<u16>() {
        Ok(0) | Err(_) => Err(ClientError::InvalidPort),
        Ok(port) => Ok(port),
    }
}
