use super::reply::Reply;
use http::{header, HeaderValue};

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Authorization, Content-Type, X-Auth-Token";
const MAX_AGE_SECS: &str = "86400";

/// Cross-origin headers stamped onto every response leaving the auth gate
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
    any_origin: bool,
}

impl CorsPolicy {
    /// `"*"` in the list allows any origin; other entries are matched exactly
    pub fn new<I, S>(allowed_origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut any_origin = false;
        let mut origins = Vec::new();

        for origin in allowed_origins {
            let origin = origin.as_ref().trim();
            if origin == "*" {
                any_origin = true;
            } else if let Ok(value) = HeaderValue::from_str(origin) {
                origins.push(value);
            } else {
                tracing::warn!("Ignoring invalid allowed origin: {:?}", origin);
            }
        }

        Self {
            allowed_origins: origins,
            any_origin,
        }
    }

    pub fn permissive() -> Self {
        Self::new(["*"])
    }

    /// Add the cross-origin headers for a request that sent `origin`.
    ///
    /// Headers the controller already set are left as they are.
    pub fn apply(&self, origin: Option<&HeaderValue>, reply: &mut Reply) {
        let headers = reply.headers_mut();

        if self.any_origin {
            headers
                .entry(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .or_insert(HeaderValue::from_static("*"));
        } else {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
            match origin {
                Some(origin) if self.allowed_origins.contains(origin) => {
                    headers
                        .entry(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                        .or_insert_with(|| origin.clone());
                }
                // Unknown origins get no allow-origin header; the browser blocks them
                _ => return,
            }
        }

        for (name, value) in [
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
            (header::ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECS),
        ] {
            headers
                .entry(name)
                .or_insert(HeaderValue::from_static(value));
        }
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::reply;
    use http::StatusCode;

    fn applied(policy: &CorsPolicy, origin: Option<&'static str>) -> Reply {
        let mut reply = reply::text(StatusCode::OK, "ok");
        let origin = origin.map(HeaderValue::from_static);
        policy.apply(origin.as_ref(), &mut reply);
        reply
    }

    #[test]
    fn test_permissive_allows_any_origin() {
        let reply = applied(&CorsPolicy::permissive(), None);

        assert_eq!(
            reply.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        assert_eq!(
            reply.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            ALLOW_HEADERS
        );
    }

    #[test]
    fn test_listed_origin_is_echoed() {
        let policy = CorsPolicy::new(["https://console.example"]);
        let reply = applied(&policy, Some("https://console.example"));

        assert_eq!(
            reply.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://console.example"
        );
        assert_eq!(reply.headers().get(header::VARY).unwrap(), "Origin");
    }

    #[test]
    fn test_controller_headers_are_kept() {
        let mut reply = reply::text(StatusCode::OK, "ok");
        reply.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://own.example"),
        );
        reply.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static("60"),
        );

        CorsPolicy::permissive().apply(None, &mut reply);

        let headers = reply.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://own.example"
        );
        assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "60");
        // Headers the controller left out are still filled in
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            ALLOW_METHODS
        );
    }

    #[test]
    fn test_unlisted_origin_gets_no_allow_origin() {
        let policy = CorsPolicy::new(["https://console.example"]);
        let reply = applied(&policy, Some("https://evil.example"));

        assert!(reply.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(reply.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }
}
