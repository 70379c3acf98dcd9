//! Backend target parsing and URI rewriting.

use std::fmt;

use axum::http::Uri;
use url::Url;

use crate::error::ProxyError;

/// Absolute http(s) URL a routing key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    url: Url,
}

impl BackendTarget {
    /// Parse a stored registry value.
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let invalid = |reason: String| ProxyError::InvalidTargetUrl {
            target: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme `{other}`"))),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self { url })
    }

    /// Point the incoming request URI at this target.
    ///
    /// Scheme and authority come from the target. The target path is joined
    /// to the request path with exactly one slash, and the target query is
    /// prepended to the request query.
    pub fn rewrite_uri(&self, incoming: &Uri) -> Result<Uri, ProxyError> {
        let host = self.url.host_str().unwrap_or_default();
        let authority = match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let path = join_paths(self.url.path(), incoming.path());
        let query = match (self.url.query().unwrap_or(""), incoming.query().unwrap_or("")) {
            ("", "") => String::new(),
            (target, "") => format!("?{target}"),
            ("", request) => format!("?{request}"),
            (target, request) => format!("?{target}&{request}"),
        };

        let rewritten = format!("{}://{}{}{}", self.url.scheme(), authority, path, query);
        Uri::try_from(rewritten.as_str()).map_err(|e| ProxyError::InvalidTargetUrl {
            target: self.url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(target: &str, uri: &str) -> String {
        BackendTarget::parse(target)
            .unwrap()
            .rewrite_uri(&uri.parse().unwrap())
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_parse_rejects_non_urls() {
        for raw in ["not a url", "", "/relative/path", "ftp://files.example.com", "mailto:ops@example.com"] {
            let err = BackendTarget::parse(raw).unwrap_err();
            assert!(
                matches!(err, ProxyError::InvalidTargetUrl { .. }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_accepts_http_and_https() {
        assert!(BackendTarget::parse("http://test.example.com").is_ok());
        assert!(BackendTarget::parse("https://10.0.0.5:8443/api").is_ok());
    }

    #[test]
    fn test_rewrite_keeps_path_and_query() {
        assert_eq!(
            rewrite("http://test.example.com", "/users/42?expand=true"),
            "http://test.example.com/users/42?expand=true"
        );
    }

    #[test]
    fn test_rewrite_origin_form_root() {
        assert_eq!(rewrite("http://127.0.0.1:3000", "/"), "http://127.0.0.1:3000/");
    }

    #[test]
    fn test_rewrite_joins_target_path() {
        assert_eq!(rewrite("http://svc:8080/api", "/users"), "http://svc:8080/api/users");
        assert_eq!(rewrite("http://svc:8080/api/", "/users"), "http://svc:8080/api/users");
    }

    #[test]
    fn test_rewrite_merges_queries() {
        assert_eq!(
            rewrite("http://svc/search?tenant=a", "/?q=rust"),
            "http://svc/search/?tenant=a&q=rust"
        );
        assert_eq!(rewrite("http://svc/?tenant=a", "/items"), "http://svc/items?tenant=a");
    }

    #[test]
    fn test_rewrite_replaces_absolute_form_authority() {
        assert_eq!(
            rewrite("https://backend.internal", "http://sub.example.com/a?b=c"),
            "https://backend.internal/a?b=c"
        );
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/", "/a"), "/a");
        assert_eq!(join_paths("/base", "/a"), "/base/a");
        assert_eq!(join_paths("/base/", "a"), "/base/a");
        assert_eq!(join_paths("/base", "a"), "/base/a");
    }
}
