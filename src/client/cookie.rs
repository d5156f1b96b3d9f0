//! Cookie and token helpers.

use regex::Regex;
use serde::Serialize;

/// Name of the query parameter and cookie carrying the login token.
pub const TOKEN_NAME: &str = "token";

/// Returns the value of cookie `name` from a `Cookie` header.
///
/// The pair must start the header or follow a space, and its value is the
/// non-empty run of characters up to the next `;`.
pub fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    let pattern = format!("(^| ){}=([^;]+)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(cookie_header)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

// == Token Resolution ==
/// Where a resolved token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    Params,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedToken {
    pub token: Option<String>,
    pub source: TokenSource,
}

/// Resolves the login token: a non-empty `token` query parameter wins,
/// otherwise the `token` cookie is used (which may be absent).
///
/// `query` is the raw query string, with or without the leading `?`.
pub fn resolve_token(query: &str, cookie_header: Option<&str>) -> ResolvedToken {
    let query = query.strip_prefix('?').unwrap_or(query);
    let from_params = url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == TOKEN_NAME)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty());

    match from_params {
        Some(token) => ResolvedToken {
            token: Some(token),
            source: TokenSource::Params,
        },
        None => ResolvedToken {
            token: cookie_header.and_then(|h| get_cookie(h, TOKEN_NAME)),
            source: TokenSource::Cookie,
        },
    }
}

/// `Set-Cookie` value storing `token` for the whole site.
pub fn token_cookie(token: &str) -> String {
    format!("{}={}; path=/; Secure; HttpOnly", TOKEN_NAME, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_first_and_later_pairs() {
        let header = "theme=dark; token=abc123; lang=en";
        assert_eq!(get_cookie(header, "theme").as_deref(), Some("dark"));
        assert_eq!(get_cookie(header, "token").as_deref(), Some("abc123"));
        assert_eq!(get_cookie(header, "lang").as_deref(), Some("en"));
    }

    #[test]
    fn test_get_cookie_requires_boundary() {
        assert_eq!(get_cookie("xtoken=nope", "token"), None);
        assert_eq!(get_cookie("a=1;token=tight", "token"), None);
    }

    #[test]
    fn test_get_cookie_missing_or_empty() {
        assert_eq!(get_cookie("", "token"), None);
        assert_eq!(get_cookie("token=; other=1", "token"), None);
    }

    #[test]
    fn test_get_cookie_escapes_name() {
        assert_eq!(get_cookie("a.b=1", "a.b").as_deref(), Some("1"));
        assert_eq!(get_cookie("axb=1", "a.b"), None);
    }

    #[test]
    fn test_resolve_token_prefers_params() {
        let resolved = resolve_token("?token=from-url&x=1", Some("token=from-cookie"));
        assert_eq!(resolved.token.as_deref(), Some("from-url"));
        assert_eq!(resolved.source, TokenSource::Params);
    }

    #[test]
    fn test_resolve_token_falls_back_to_cookie() {
        let resolved = resolve_token("token=", Some("token=from-cookie"));
        assert_eq!(resolved.token.as_deref(), Some("from-cookie"));
        assert_eq!(resolved.source, TokenSource::Cookie);
    }

    #[test]
    fn test_resolve_token_none_anywhere() {
        let resolved = resolve_token("", None);
        assert_eq!(resolved.token, None);
        assert_eq!(resolved.source, TokenSource::Cookie);
    }

    #[test]
    fn test_resolve_token_decodes_params() {
        let resolved = resolve_token("token=a%2Bb", None);
        assert_eq!(resolved.token.as_deref(), Some("a+b"));
    }

    #[test]
    fn test_token_cookie() {
        assert_eq!(token_cookie("abc"), "token=abc; path=/; Secure; HttpOnly");
    }
}
